use serde::Deserialize;

use super::announcement::Audience;

/// Role of the person asking for announcements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerRole {
    Student,
    Admin,
    Teacher,
    /// Unknown or absent role: only sees announcements for everyone.
    Other(String),
}

impl ViewerRole {
    /// Parse a role name case-insensitively. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "student" => ViewerRole::Student,
            "admin" => ViewerRole::Admin,
            "teacher" => ViewerRole::Teacher,
            other => ViewerRole::Other(other.to_string()),
        }
    }

    /// Whether an announcement tagged with `audience` is visible to this role.
    pub fn can_see(&self, audience: Audience) -> bool {
        match (self, audience) {
            (_, Audience::Everyone) => true,
            (ViewerRole::Student, Audience::Students) => true,
            (ViewerRole::Admin, Audience::Admin) => true,
            (ViewerRole::Teacher, Audience::Teachers) => true,
            _ => false,
        }
    }

    /// Low-cardinality label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ViewerRole::Student => "student",
            ViewerRole::Admin => "admin",
            ViewerRole::Teacher => "teacher",
            ViewerRole::Other(_) => "other",
        }
    }
}

impl Default for ViewerRole {
    fn default() -> Self {
        ViewerRole::Other(String::new())
    }
}

impl std::fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerRole::Other(s) => write!(f, "{s}"),
            known => write!(f, "{}", known.label()),
        }
    }
}

impl std::str::FromStr for ViewerRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ViewerRole::parse(s))
    }
}

/// Query params for GET /announcements and GET /announcements/recent.
#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

impl RoleQuery {
    pub fn viewer_role(&self) -> ViewerRole {
        self.role.as_deref().map(ViewerRole::parse).unwrap_or_default()
    }
}
