//! Subscription tier ordering.
//!
//! The single source of truth for tier ranks. Every access comparison in the
//! codebase goes through [`SubscriptionTier::rank`].

use serde::{Deserialize, Serialize};

/// Membership subscription tier, ordered from lowest to highest access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Foundation,
    Mastery,
    Executive,
}

impl SubscriptionTier {
    /// Numeric rank used for access comparisons. Higher rank = more access.
    pub fn rank(&self) -> u8 {
        match self {
            SubscriptionTier::Free => 0,
            SubscriptionTier::Foundation => 1,
            SubscriptionTier::Mastery => 2,
            SubscriptionTier::Executive => 3,
        }
    }

    /// True when a member at this tier may view content requiring `required`.
    pub fn meets(&self, required: SubscriptionTier) -> bool {
        self.rank() >= required.rank()
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Foundation => "Foundation",
            SubscriptionTier::Mastery => "Mastery",
            SubscriptionTier::Executive => "Executive",
        }
    }

    /// Lowercase storage form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Foundation => "foundation",
            SubscriptionTier::Mastery => "mastery",
            SubscriptionTier::Executive => "executive",
        }
    }

    /// Parses the lowercase storage form.
    pub fn parse(s: &str) -> Option<SubscriptionTier> {
        match s {
            "free" => Some(SubscriptionTier::Free),
            "foundation" => Some(SubscriptionTier::Foundation),
            "mastery" => Some(SubscriptionTier::Mastery),
            "executive" => Some(SubscriptionTier::Executive),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
