use thiserror::Error;

/// Shown to app users whenever the announcements endpoint cannot be reached.
pub const NETWORK_USER_MESSAGE: &str =
    "Unable to load announcements. Please check your connection and try again.";

/// Why an upstream GET did not produce a JSON document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unauthenticated (HTTP {status})")]
    Unauthenticated { status: u16 },

    #[error("endpoint not found (HTTP 404)")]
    NotFound,

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("unexpected status (HTTP {status})")]
    Status { status: u16 },

    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

impl FetchError {
    /// Classify a non-2xx status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FetchError::Unauthenticated { status },
            404 => FetchError::NotFound,
            500..=599 => FetchError::Server { status },
            _ => FetchError::Status { status },
        }
    }

    /// Short label used for the fetch outcome metric.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Unauthenticated { .. } => "unauthenticated",
            FetchError::NotFound => "not_found",
            FetchError::Server { .. } => "server_error",
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnouncementError {
    /// The fetch failed transport-side or the server answered non-2xx.
    #[error("network error: {0}")]
    Network(#[from] FetchError),
}

impl AnnouncementError {
    /// Message safe to show to end users. The technical cause stays in `Display`.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnnouncementError::Network(_) => NETWORK_USER_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnnouncementError>;
