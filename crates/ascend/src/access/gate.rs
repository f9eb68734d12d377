//! The gating decision for a single content item.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalog::ContentItem;
use super::tier::SubscriptionTier;
use super::{clock, drip};

/// Verdict for rendering one content item to one member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Content is viewable.
    Show,
    /// The member's tier is below the item's required tier; render the
    /// upgrade prompt.
    LockedTier {
        #[serde(rename = "requiredTier")]
        required_tier: SubscriptionTier,
    },
    /// Tier is sufficient but the item has not reached its release week.
    LockedSchedule {
        #[serde(rename = "releaseDate")]
        release_date: DateTime<Utc>,
        countdown: String,
    },
}

/// Decides whether `item` is viewable by a member of `user_tier` enrolled at
/// `enrolled_at`, as of `now`.
///
/// Tier gating is evaluated before schedule gating: a member below the
/// required tier sees the upgrade prompt, never a countdown for content
/// their tier cannot reach. Reversing the order changes user-visible
/// messaging.
pub fn decide(
    user_tier: SubscriptionTier,
    item: &ContentItem,
    enrolled_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AccessDecision {
    if !user_tier.meets(item.required_tier) {
        return AccessDecision::LockedTier {
            required_tier: item.required_tier,
        };
    }

    let week = clock::current_week(enrolled_at, now);
    if !drip::is_available(item.week_number, week) {
        let release = drip::release_date(enrolled_at, item.week_number);
        let countdown = drip::time_until_release(release, now).unwrap_or_default();
        return AccessDecision::LockedSchedule {
            release_date: release,
            countdown,
        };
    }

    AccessDecision::Show
}
