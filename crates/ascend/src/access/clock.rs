//! Derives a member's current curriculum week from their enrollment date.

use chrono::{DateTime, Utc};

/// Number of the week `now` falls in, counted from `enrolled_at`.
///
/// Week 1 starts at the enrollment instant; each later week starts exactly
/// 7 days after the previous one. Clock skew (`now` before `enrolled_at`)
/// still reports week 1, never zero or a negative week.
pub fn current_week(enrolled_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_days = now.signed_duration_since(enrolled_at).num_days();
    if elapsed_days < 0 {
        return 1;
    }
    elapsed_days / 7 + 1
}
