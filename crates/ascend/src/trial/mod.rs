//! Trial window tracking.
//!
//! A trial starts the first time a member's status is checked and runs for
//! [`TRIAL_LENGTH_DAYS`]. Creation is handled atomically by the database
//! layer; this module holds the window type and its time-derived accessors,
//! which take `now` explicitly and are recomputed on every check.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Length of the free trial window.
pub const TRIAL_LENGTH_DAYS: i64 = 14;

const SECONDS_PER_DAY: i64 = 86_400;

/// A member's trial window. Created once; read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialRecord {
    #[serde(rename = "trialStartDate")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "trialEndDate")]
    pub ends_at: DateTime<Utc>,
}

impl TrialRecord {
    /// A fresh trial window opening at `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            ends_at: now + Duration::days(TRIAL_LENGTH_DAYS),
        }
    }

    /// True while the trial is running. The end instant itself is inclusive.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now <= self.ends_at
    }

    /// True once the trial window has passed.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }

    /// Whole days remaining, rounded up, floored at zero.
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        let remaining_secs = self.ends_at.signed_duration_since(now).num_seconds();
        if remaining_secs <= 0 {
            return 0;
        }
        (remaining_secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn opened() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn window_spans_fourteen_days() {
        let trial = TrialRecord::starting_at(opened());
        assert_eq!(trial.ends_at - trial.started_at, Duration::days(14));
    }

    #[test]
    fn end_instant_is_inclusive() {
        let trial = TrialRecord::starting_at(opened());
        assert!(trial.is_active(trial.ends_at));
        assert!(!trial.has_expired(trial.ends_at));

        let one_second_later = trial.ends_at + Duration::seconds(1);
        assert!(!trial.is_active(one_second_later));
        assert!(trial.has_expired(one_second_later));
    }

    #[test]
    fn days_left_rounds_up_partial_days() {
        let trial = TrialRecord::starting_at(opened());
        assert_eq!(trial.days_left(trial.started_at), 14);
        // 13 days 1 hour remaining still counts as 14.
        assert_eq!(trial.days_left(trial.started_at + Duration::hours(23)), 14);
        assert_eq!(trial.days_left(trial.started_at + Duration::days(1)), 13);
        assert_eq!(trial.days_left(trial.ends_at - Duration::hours(1)), 1);
    }

    #[test]
    fn days_left_floors_at_zero() {
        let trial = TrialRecord::starting_at(opened());
        assert_eq!(trial.days_left(trial.ends_at), 0);
        assert_eq!(trial.days_left(trial.ends_at + Duration::days(40)), 0);
    }
}
