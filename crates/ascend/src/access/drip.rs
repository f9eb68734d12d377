//! Drip schedule: when a content item unlocks relative to enrollment.

use chrono::{DateTime, Duration, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// True once the member's current week has reached the item's release week.
///
/// Monotonic in `current_week`: once an item is available it stays available.
pub fn is_available(required_week: i64, current_week: i64) -> bool {
    required_week <= current_week
}

/// Absolute instant at which an item scheduled for `required_week` unlocks.
///
/// Independent of "now": week 1 content unlocks at the enrollment instant,
/// week N content exactly `(N - 1) * 7` days later.
pub fn release_date(enrolled_at: DateTime<Utc>, required_week: i64) -> DateTime<Utc> {
    enrolled_at + Duration::weeks(required_week - 1)
}

/// Human-readable countdown until `release_date`, or `None` once unlocked.
///
/// Remaining time is rounded up to whole days before formatting, so a
/// release 30 hours away reads "Unlocks in 2 days", never "1 day".
pub fn time_until_release(release_date: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    let remaining_secs = release_date.signed_duration_since(now).num_seconds();
    if remaining_secs <= 0 {
        return None;
    }

    let days = (remaining_secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    Some(if days <= 1 {
        "Unlocks tomorrow".to_string()
    } else if days <= 7 {
        format!("Unlocks in {days} days")
    } else {
        let weeks = (days + 6) / 7;
        format!("Unlocks in {weeks} weeks")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap()
    }

    #[test]
    fn availability_is_monotonic_in_current_week() {
        assert!(!is_available(4, 3));
        assert!(is_available(4, 4));
        for week in 4..20 {
            assert!(is_available(4, week));
        }
    }

    #[test]
    fn release_dates_step_by_whole_weeks() {
        let start = base();
        assert_eq!(release_date(start, 1), start);
        assert_eq!(release_date(start, 2), start + Duration::days(7));
        assert_eq!(release_date(start, 5), start + Duration::days(28));
    }

    #[test]
    fn released_content_has_no_countdown() {
        let now = base();
        assert_eq!(time_until_release(now, now), None);
        assert_eq!(time_until_release(now - Duration::days(2), now), None);
    }

    #[test]
    fn under_a_day_reads_tomorrow() {
        let now = base();
        assert_eq!(
            time_until_release(now + Duration::hours(20), now),
            Some("Unlocks tomorrow".to_string())
        );
        assert_eq!(
            time_until_release(now + Duration::hours(24), now),
            Some("Unlocks tomorrow".to_string())
        );
    }

    #[test]
    fn partial_days_round_up() {
        let now = base();
        // 25 hours is more than one whole day, so it reports two.
        assert_eq!(
            time_until_release(now + Duration::hours(25), now),
            Some("Unlocks in 2 days".to_string())
        );
        assert_eq!(
            time_until_release(now + Duration::hours(30), now),
            Some("Unlocks in 2 days".to_string())
        );
    }

    #[test]
    fn a_week_or_less_reads_in_days() {
        let now = base();
        assert_eq!(
            time_until_release(now + Duration::days(7), now),
            Some("Unlocks in 7 days".to_string())
        );
    }

    #[test]
    fn beyond_a_week_reads_in_weeks_rounded_up() {
        let now = base();
        assert_eq!(
            time_until_release(now + Duration::days(8), now),
            Some("Unlocks in 2 weeks".to_string())
        );
        assert_eq!(
            time_until_release(now + Duration::days(10), now),
            Some("Unlocks in 2 weeks".to_string())
        );
        assert_eq!(
            time_until_release(now + Duration::days(15), now),
            Some("Unlocks in 3 weeks".to_string())
        );
    }
}
