use std::cmp::Ordering;

use chrono::{DateTime, Duration, Months, Utc};

use crate::models::{announcement::Announcement, role::ViewerRole};

/// Default admission window for the feed.
pub const DEFAULT_WINDOW_MONTHS: u32 = 6;

/// Age under which an announcement gets the "new" badge.
pub const RECENT_HOURS: i64 = 48;

/// Keep only the announcements `role` is allowed to see, preserving order.
pub fn filter_by_audience(records: Vec<Announcement>, role: &ViewerRole) -> Vec<Announcement> {
    records
        .into_iter()
        .filter(|a| role.can_see(a.audience()))
        .collect()
}

/// Start of the admission window: `now` minus `months` calendar months.
///
/// Day-of-month is clamped to the target month's length, so 31 August minus
/// six months is 28 (or 29) February.
pub fn window_start(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Keep announcements created on or after `window_start(now, months)`.
///
/// Records with an unreadable `created_at` are kept; they render as
/// "Invalid Date" rather than disappearing from the feed.
pub fn within_window(
    records: Vec<Announcement>,
    now: DateTime<Utc>,
    months: u32,
) -> Vec<Announcement> {
    let cutoff = window_start(now, months);
    records
        .into_iter()
        .filter(|a| match a.created_at_utc() {
            Some(created) => created >= cutoff,
            None => true,
        })
        .collect()
}

/// True iff the announcement is at most 48 hours old. Future timestamps count as recent.
pub fn is_recent(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at <= Duration::hours(RECENT_HOURS)
}

/// Stable newest-first sort. Unreadable timestamps go last.
pub fn sort_newest_first(records: &mut [Announcement]) {
    records.sort_by(|a, b| match (a.created_at_utc(), b.created_at_utc()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ann(id: i64, audience: &str, created_at: &str) -> Announcement {
        Announcement {
            id: Some(crate::models::announcement::AnnouncementId::Number(id)),
            subject: format!("subject {id}"),
            body: String::new(),
            audience: Some(audience.to_string()),
            created_at: created_at.to_string(),
        }
    }

    fn ids(records: &[Announcement]) -> Vec<String> {
        records
            .iter()
            .map(|a| a.id.as_ref().unwrap().to_string())
            .collect()
    }

    fn mixed() -> Vec<Announcement> {
        vec![
            ann(1, "everyone", "2025-06-01T00:00:00Z"),
            ann(2, "students", "2025-06-01T00:00:00Z"),
            ann(3, "admin", "2025-06-01T00:00:00Z"),
            ann(4, "teacher", "2025-06-01T00:00:00Z"),
            ann(5, "Teachers", "2025-06-01T00:00:00Z"),
            ann(6, "parents", "2025-06-01T00:00:00Z"),
        ]
    }

    #[test]
    fn test_everyone_is_visible_to_every_role() {
        for role in ["student", "admin", "teacher", "parent", ""] {
            let out = filter_by_audience(mixed(), &ViewerRole::parse(role));
            assert!(ids(&out).contains(&"1".to_string()), "role {role:?}");
        }
    }

    #[test]
    fn test_role_specific_audiences() {
        assert_eq!(ids(&filter_by_audience(mixed(), &ViewerRole::Student)), ["1", "2"]);
        assert_eq!(ids(&filter_by_audience(mixed(), &ViewerRole::Admin)), ["1", "3"]);
        assert_eq!(ids(&filter_by_audience(mixed(), &ViewerRole::Teacher)), ["1", "4", "5"]);
        assert_eq!(ids(&filter_by_audience(mixed(), &ViewerRole::parse("guest"))), ["1"]);
    }

    #[test]
    fn test_audience_match_ignores_case() {
        let records = vec![ann(1, "STUDENTS", "2025-06-01T00:00:00Z")];
        assert_eq!(filter_by_audience(records, &ViewerRole::parse("Student")).len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(filter_by_audience(Vec::new(), &ViewerRole::Admin).is_empty());
        assert!(within_window(Vec::new(), Utc::now(), 6).is_empty());
    }

    #[test]
    fn test_window_start_uses_calendar_months() {
        let now = Utc.with_ymd_and_hms(2025, 6, 25, 12, 0, 0).unwrap();
        assert_eq!(
            window_start(now, 6),
            Utc.with_ymd_and_hms(2024, 12, 25, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_window_start_clamps_month_end() {
        let now = Utc.with_ymd_and_hms(2025, 8, 31, 10, 0, 0).unwrap();
        assert_eq!(
            window_start(now, 6),
            Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap()
        );
        let leap = Utc.with_ymd_and_hms(2024, 8, 31, 10, 0, 0).unwrap();
        assert_eq!(
            window_start(leap, 6),
            Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_within_window_boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2025, 6, 25, 12, 0, 0).unwrap();
        let records = vec![
            ann(1, "everyone", "2024-12-25T12:00:00Z"),
            ann(2, "everyone", "2024-12-25T11:59:59Z"),
            ann(3, "everyone", "2025-06-24T00:00:00Z"),
        ];
        assert_eq!(ids(&within_window(records, now, 6)), ["1", "3"]);
    }

    #[test]
    fn test_within_window_keeps_unreadable_timestamps() {
        let now = Utc.with_ymd_and_hms(2025, 6, 25, 12, 0, 0).unwrap();
        let records = vec![ann(1, "everyone", "garbage"), ann(2, "everyone", "2020-01-01")];
        assert_eq!(ids(&within_window(records, now, 6)), ["1"]);
    }

    #[test]
    fn test_is_recent_48_hour_threshold() {
        let now = Utc.with_ymd_and_hms(2025, 6, 25, 12, 0, 0).unwrap();
        assert!(is_recent(now - Duration::hours(48), now));
        assert!(!is_recent(now - Duration::hours(48) - Duration::seconds(1), now));
        assert!(is_recent(now - Duration::minutes(5), now));
        assert!(is_recent(now + Duration::hours(3), now));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut records = vec![
            ann(1, "everyone", "2025-01-01T00:00:00Z"),
            ann(2, "everyone", "not-a-date"),
            ann(3, "everyone", "2025-06-01T00:00:00Z"),
            ann(4, "everyone", "2025-03-01T00:00:00Z"),
        ];
        sort_newest_first(&mut records);
        assert_eq!(ids(&records), ["3", "4", "1", "2"]);
    }
}
