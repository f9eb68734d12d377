//! Booking creation with slot-conflict enforcement.
//!
//! A slot is a `(session_date, session_time)` pair; at most one non-cancelled
//! booking may occupy it. The pre-check here is a fast path only — the
//! partial unique index on the bookings table decides the race at write time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::db::{self, DbBooking, MemberDb};

/// Client payload for `POST /bookings`. All fields are optional at the wire
/// level so that missing ones can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    #[serde(rename = "sessionType")]
    pub session_type: Option<String>,
    #[serde(rename = "sessionDate")]
    pub session_date: Option<String>,
    #[serde(rename = "sessionTime")]
    pub session_time: Option<String>,
    pub notes: Option<String>,
}

/// Failures from the booking flow.
#[derive(Debug, Error)]
pub enum BookingError {
    /// A required field was not supplied
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// sessionDate was not a calendar date
    #[error("Invalid session date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    /// The slot already holds a non-cancelled booking
    #[error("This time slot is already booked. Please choose another time.")]
    SlotTaken,

    /// The data store failed
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl BookingError {
    /// Machine-readable discriminator for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::MissingField { .. } | BookingError::InvalidDate { .. } => "validation",
            BookingError::SlotTaken => "slot_conflict",
            BookingError::Storage(_) => "dependency",
        }
    }
}

/// A booking request with every required field present and parsed.
#[derive(Debug, Clone)]
pub struct ValidatedBooking {
    pub session_type: String,
    pub session_date: NaiveDate,
    pub session_time: String,
    pub notes: Option<String>,
}

/// Checks that every required field is present and the date parses.
pub fn validate(request: &BookingRequest) -> Result<ValidatedBooking, BookingError> {
    let session_type = non_empty(&request.session_type, "sessionType")?;
    let raw_date = non_empty(&request.session_date, "sessionDate")?;
    let session_time = non_empty(&request.session_time, "sessionTime")?;

    let session_date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDate { value: raw_date })?;

    Ok(ValidatedBooking {
        session_type,
        session_date,
        session_time,
        notes: request.notes.clone().filter(|n| !n.trim().is_empty()),
    })
}

fn non_empty(value: &Option<String>, field: &'static str) -> Result<String, BookingError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(BookingError::MissingField { field }),
    }
}

/// Creates a pending booking for `user_id` if the requested slot is free.
///
/// The `find_active_booking` pre-check short-circuits the obvious case;
/// conflict enforcement itself happens at write time via the unique index,
/// so two near-simultaneous requests for one slot yield exactly one booking.
pub fn create_booking(
    db: &MemberDb,
    user_id: &str,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<DbBooking, BookingError> {
    let validated = validate(request)?;

    if db
        .find_active_booking(validated.session_date, &validated.session_time)?
        .is_some()
    {
        return Err(BookingError::SlotTaken);
    }

    match db.insert_booking(
        user_id,
        &validated.session_type,
        validated.session_date,
        &validated.session_time,
        validated.notes.as_deref(),
        now,
    ) {
        Ok(booking) => {
            info!(
                booking_id = booking.booking_id,
                session_date = %booking.session_date,
                session_time = %booking.session_time,
                "Created booking"
            );
            Ok(booking)
        }
        Err(e) if db::is_unique_violation(&e) => Err(BookingError::SlotTaken),
        Err(e) => Err(BookingError::Storage(e)),
    }
}
