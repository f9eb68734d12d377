/// Row types for the member database

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::access::SubscriptionTier;

/// Lifecycle state of a booked session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// A member profile row.
#[derive(Debug, Clone)]
pub struct DbProfile {
    pub user_id: String,
    pub subscription_tier: SubscriptionTier,
    /// When this member's curriculum clock started. Set once, on first touch.
    pub enrolled_at: DateTime<Utc>,
    pub trial_started_at: Option<DateTime<Utc>>,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

/// A booked coaching session row.
#[derive(Debug, Clone, Serialize)]
pub struct DbBooking {
    #[serde(rename = "bookingId")]
    pub booking_id: i64,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "sessionType")]
    pub session_type: String,
    #[serde(rename = "sessionDate")]
    pub session_date: NaiveDate,
    /// Slot label as chosen by the client (e.g. "10:00 AM"), compared by
    /// exact string equality.
    #[serde(rename = "sessionTime")]
    pub session_time: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
