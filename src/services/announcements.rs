use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    error::Result,
    models::{
        announcement::{Announcement, DisplayAnnouncement},
        role::ViewerRole,
    },
    services::{
        filters::{self, DEFAULT_WINDOW_MONTHS},
        formatter::AnnouncementFormatter,
        http::HttpClient,
        metrics,
        single_flight::SingleFlight,
    },
};

type FeedResult = Result<Vec<DisplayAnnouncement>>;

/// Fetch → audience filter → window filter → newest first → format.
///
/// Cheap to clone; clones share the HTTP client and the in-flight table.
#[derive(Clone)]
pub struct AnnouncementService {
    client: Arc<dyn HttpClient>,
    url: String,
    window_months: u32,
    formatter: AnnouncementFormatter,
    clock: fn() -> DateTime<Utc>,
    /// Keyed by role label: every unrecognised role sees the same feed.
    in_flight: Arc<SingleFlight<&'static str, FeedResult>>,
}

impl AnnouncementService {
    pub fn new(client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            window_months: DEFAULT_WINDOW_MONTHS,
            formatter: AnnouncementFormatter::default(),
            clock: Utc::now,
            in_flight: Arc::new(SingleFlight::new()),
        }
    }

    pub fn with_window_months(mut self, months: u32) -> Self {
        self.window_months = months;
        self
    }

    pub fn with_formatter(mut self, formatter: AnnouncementFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replace the reference clock (tests pin "now" with this).
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Roles with a feed request currently waiting on the endpoint.
    pub fn in_flight(&self) -> usize {
        self.in_flight.in_flight()
    }

    /// One GET against the announcements endpoint.
    ///
    /// A 2xx payload that is not a JSON array yields an empty list.
    pub async fn fetch_all(&self) -> Result<Vec<Announcement>> {
        let started = Instant::now();
        let result = self.client.get_json(&self.url).await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(payload) => {
                metrics::record_fetch("ok", elapsed);
                Ok(decode_records(payload))
            }
            Err(e) => {
                metrics::record_fetch(e.kind(), elapsed);
                error!("Failed to fetch announcements from {}: {}", self.url, e);
                Err(e.into())
            }
        }
    }

    /// The feed for `role`, newest first.
    ///
    /// Concurrent calls for the same role share one upstream fetch, which runs
    /// to completion even if every caller is dropped. A fetch failure fails the
    /// whole call; no partial list is returned.
    pub async fn get_for_user(&self, role: &ViewerRole) -> FeedResult {
        let this = self.clone();
        let key = role.clone();
        let feed = self
            .in_flight
            .run(role.label(), move || async move { this.load_feed(&key).await })
            .await?;

        metrics::record_served(role.label(), feed.len());
        Ok(feed)
    }

    pub async fn has_recent_for_user(&self, role: &ViewerRole) -> Result<bool> {
        Ok(self.get_for_user(role).await?.iter().any(|a| a.is_recent))
    }

    pub async fn count_recent_for_user(&self, role: &ViewerRole) -> Result<usize> {
        Ok(self
            .get_for_user(role)
            .await?
            .iter()
            .filter(|a| a.is_recent)
            .count())
    }

    /// Every step after the fetch. Pure: same records and `now` give the same feed.
    pub fn assemble(
        &self,
        records: Vec<Announcement>,
        role: &ViewerRole,
        now: DateTime<Utc>,
    ) -> Vec<DisplayAnnouncement> {
        let visible = filters::filter_by_audience(records, role);
        let mut current = filters::within_window(visible, now, self.window_months);
        filters::sort_newest_first(&mut current);
        current
            .iter()
            .map(|a| self.formatter.format(a, now))
            .collect()
    }

    async fn load_feed(&self, role: &ViewerRole) -> FeedResult {
        let records = self.fetch_all().await?;
        let fetched = records.len();
        let feed = self.assemble(records, role, (self.clock)());
        debug!(
            "Announcements for role '{}': {} fetched, {} shown",
            role, fetched, feed.len()
        );
        Ok(feed)
    }
}

/// Coerce the endpoint payload into records. Elements that do not decode are skipped.
fn decode_records(payload: Value) -> Vec<Announcement> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            debug!("Announcements payload is not a list ({}), treating as empty", kind_of(&other));
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<Announcement>(item) {
            Ok(a) => Some(a),
            Err(e) => {
                warn!("Skipping announcement #{idx}: {e}");
                None
            }
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
