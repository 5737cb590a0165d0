use std::env;
use std::time::Duration;

use crate::services::filters::DEFAULT_WINDOW_MONTHS;

#[derive(Debug, Clone)]
pub struct Config {
    /// ERP endpoint returning the JSON array of announcements.
    pub announcements_url: String,
    pub host: String,
    pub port: u16,
    pub window_months: u32,
    /// Unset means no timeout beyond the transport's own.
    pub http_timeout: Option<Duration>,
    /// Minutes east of UTC used for absolute dates (330 for IST).
    pub display_utc_offset_minutes: i32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            announcements_url: required("ANNOUNCEMENTS_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            window_months: env::var("ANNOUNCEMENT_WINDOW_MONTHS")
                .unwrap_or_else(|_| DEFAULT_WINDOW_MONTHS.to_string())
                .parse()?,
            http_timeout: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|v| v.parse::<u64>())
                .transpose()?
                .map(Duration::from_secs),
            display_utc_offset_minutes: env::var("DISPLAY_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".into())
                .parse()?,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing required env var: {}", key))
}
