//! Content access policy.
//!
//! Two small engines compose to decide whether a member may see a content
//! item right now: the enrollment clock (which week is it for this member)
//! and the drip schedule (which week does this item unlock), gated behind
//! the subscription tier ordering. Every derivation takes `now` as an
//! explicit parameter; only the outermost caller touches the wall clock.

mod catalog;
mod clock;
mod drip;
mod gate;
mod tier;

pub use catalog::{ContentCatalog, ContentItem};
pub use clock::current_week;
pub use drip::{is_available, release_date, time_until_release};
pub use gate::{decide, AccessDecision};
pub use tier::SubscriptionTier;
