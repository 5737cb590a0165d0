use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Server-assigned identifier; usually a number or a string.
///
/// Anything else the ERP sends is kept verbatim so the record is never
/// dropped because of its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnouncementId {
    Number(i64),
    Text(String),
    Other(Value),
}

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnouncementId::Number(n) => write!(f, "{n}"),
            AnnouncementId::Text(s) => write!(f, "{s}"),
            AnnouncementId::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Raw announcement record as returned by the ERP endpoint.
///
/// `created_at` is kept as received so a malformed timestamp still flows
/// through the pipeline and renders as "Invalid Date".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default)]
    pub id: Option<AnnouncementId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub body: String,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

impl Announcement {
    pub fn audience(&self) -> Audience {
        Audience::parse(self.audience.as_deref().unwrap_or_default())
    }

    /// Parsed `created_at`, or `None` when the server sent something unreadable.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Visibility tag on an announcement (case-insensitive on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    Students,
    Admin,
    /// Both "teacher" and "teachers" are used by the ERP.
    Teachers,
    Other,
}

impl Audience {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "everyone" => Audience::Everyone,
            "students" => Audience::Students,
            "admin" => Audience::Admin,
            "teacher" | "teachers" => Audience::Teachers,
            _ => Audience::Other,
        }
    }

    /// Hex color token used by the app for the audience chip.
    pub fn color(self) -> &'static str {
        match self {
            Audience::Everyone => "#10b981",
            Audience::Students => "#3b82f6",
            Audience::Admin => "#f59e0b",
            Audience::Teachers => "#8b5cf6",
            Audience::Other => "#64748b",
        }
    }
}

/// Announcement plus the display-only fields derived at format time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAnnouncement {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub formatted_date: String,
    pub formatted_date_time: String,
    pub is_recent: bool,
    pub audience_color: &'static str,
    /// 1 (most important) to 4.
    pub priority_level: u8,
}

/// Accepts RFC 3339, naive ISO-8601 date-times (read as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Null becomes empty, numbers and booleans are stringified.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
