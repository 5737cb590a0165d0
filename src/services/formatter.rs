//! Display-only fields derived from an announcement.
//!
//! Everything here is a pure function of the record, the reference time and
//! the display offset, so formatting the same record twice gives the same
//! output.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::models::announcement::{Announcement, Audience, DisplayAnnouncement};
use crate::services::filters::is_recent;

pub const INVALID_DATE: &str = "Invalid Date";

const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy)]
pub struct AnnouncementFormatter {
    /// Offset used for absolute dates ("Jun 23, 2025"); relative tiers ignore it.
    offset: FixedOffset,
}

impl Default for AnnouncementFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl AnnouncementFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Build from an offset in minutes east of UTC. Out-of-range values fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .unwrap_or_else(|| {
                tracing::warn!("Display offset {minutes} min out of range, using UTC");
                Self::utc()
            })
    }

    pub fn format(&self, announcement: &Announcement, now: DateTime<Utc>) -> DisplayAnnouncement {
        let created = announcement.created_at_utc();
        let audience = announcement.audience();
        let recent = created.is_some_and(|c| is_recent(c, now));

        let (formatted_date, formatted_date_time) = match created {
            Some(c) => (self.relative_date(c, now), self.date_time(c)),
            None => (INVALID_DATE.to_string(), INVALID_DATE.to_string()),
        };

        DisplayAnnouncement {
            announcement: announcement.clone(),
            formatted_date,
            formatted_date_time,
            is_recent: recent,
            audience_color: audience.color(),
            priority_level: priority_level(recent, audience),
        }
    }

    /// "Today", "Yesterday", "N days ago", "N weeks ago", then an absolute date.
    pub fn relative_date(&self, created: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let days = (now - created).num_milliseconds().abs() / MS_PER_DAY;
        match days {
            0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            2..=6 => format!("{days} days ago"),
            7..=29 => match days / 7 {
                1 => "1 week ago".to_string(),
                weeks => format!("{weeks} weeks ago"),
            },
            _ => created
                .with_timezone(&self.offset)
                .format("%b %-d, %Y")
                .to_string(),
        }
    }

    /// "June 25, 2025, 08:00 AM"
    pub fn date_time(&self, created: DateTime<Utc>) -> String {
        created
            .with_timezone(&self.offset)
            .format("%B %-d, %Y, %I:%M %p")
            .to_string()
    }
}

/// Lower is more important: recency first, then audience breadth.
pub fn priority_level(recent: bool, audience: Audience) -> u8 {
    match (recent, audience == Audience::Everyone) {
        (true, true) => 1,
        (true, false) => 2,
        (false, true) => 3,
        (false, false) => 4,
    }
}
