/// Database module for member profiles, trial windows, and session bookings

mod types;

pub use types::{BookingStatus, DbBooking, DbProfile};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Result};
use std::sync::Mutex;

use crate::access::SubscriptionTier;
use crate::trial::TrialRecord;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_members.sql");

const BOOKING_COLUMNS: &str =
    "booking_id, user_id, session_type, session_date, session_time, notes, status, created_at";

/// Storage manager for member state.
///
/// All access goes through one connection guarded by a mutex. The schema's
/// constraints are the source of truth for uniqueness: profile and trial
/// creation use insert-if-absent upserts, and the partial unique index on
/// active booking slots decides booking races at write time.
pub struct MemberDb {
    db: Mutex<Connection>,
}

impl MemberDb {
    /// Opens (or creates) the database at `db_path` and applies the schema.
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Fetches the member's profile, creating it on first touch.
    ///
    /// Creation is an atomic insert-if-absent: concurrent first calls all
    /// land on the same row, and `enrolled_at` is set exactly once.
    pub fn get_or_create_profile(&self, user_id: &str, now: DateTime<Utc>) -> Result<DbProfile> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO profiles (user_id, subscription_tier, enrolled_at)
             VALUES (?1, 'free', ?2)
             ON CONFLICT(user_id) DO NOTHING",
            (user_id, now),
        )?;
        Self::read_profile(&db, user_id)
    }

    /// Fetches the member's trial window, creating it on first check.
    ///
    /// The upsert only fills trial columns that are still NULL, so repeated
    /// and concurrent calls all observe the same window: exactly one logical
    /// write ever happens per member.
    pub fn get_or_create_trial(&self, user_id: &str, now: DateTime<Utc>) -> Result<TrialRecord> {
        let window = TrialRecord::starting_at(now);
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO profiles (user_id, subscription_tier, enrolled_at, trial_started_at, trial_ends_at)
             VALUES (?1, 'free', ?2, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                 trial_started_at = COALESCE(profiles.trial_started_at, excluded.trial_started_at),
                 trial_ends_at = COALESCE(profiles.trial_ends_at, excluded.trial_ends_at)",
            (user_id, window.started_at, window.ends_at),
        )?;

        let (started_at, ends_at) = db.query_row(
            "SELECT trial_started_at, trial_ends_at FROM profiles WHERE user_id = ?1",
            [user_id],
            |row| Ok((row.get::<_, DateTime<Utc>>(0)?, row.get::<_, DateTime<Utc>>(1)?)),
        )?;
        Ok(TrialRecord {
            started_at,
            ends_at,
        })
    }

    /// Updates a member's subscription tier (driven by out-of-band billing).
    pub fn set_subscription_tier(&self, user_id: &str, tier: SubscriptionTier) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let changed = db.execute(
            "UPDATE profiles SET subscription_tier = ?2 WHERE user_id = ?1",
            (user_id, tier.as_str()),
        )?;
        Ok(changed > 0)
    }

    /// Looks up a non-cancelled booking occupying the given slot, if any.
    pub fn find_active_booking(
        &self,
        session_date: NaiveDate,
        session_time: &str,
    ) -> Result<Option<DbBooking>> {
        let db = self.db.lock().unwrap();
        db.query_row(
            &format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings
                 WHERE session_date = ?1 AND session_time = ?2 AND status != 'cancelled'"
            ),
            (session_date, session_time),
            Self::booking_from_row,
        )
        .optional()
    }

    /// Inserts a new pending booking.
    ///
    /// The partial unique index on active `(session_date, session_time)`
    /// slots makes this write the authoritative conflict check; callers
    /// classify failures with [`is_unique_violation`].
    pub fn insert_booking(
        &self,
        user_id: &str,
        session_type: &str,
        session_date: NaiveDate,
        session_time: &str,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DbBooking> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO bookings (user_id, session_type, session_date, session_time, notes, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                user_id,
                session_type,
                session_date,
                session_time,
                notes,
                BookingStatus::Pending.as_str(),
                now,
            ),
        )?;

        let booking_id = db.last_insert_rowid();
        db.query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = ?1"),
            [booking_id],
            Self::booking_from_row,
        )
    }

    /// All bookings made by one member, newest first.
    pub fn bookings_for_user(&self, user_id: &str) -> Result<Vec<DbBooking>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE user_id = ?1
             ORDER BY session_date DESC, booking_id DESC"
        ))?;

        let bookings = stmt.query_map([user_id], Self::booking_from_row)?;
        bookings.collect()
    }

    /// Marks one of `user_id`'s pending bookings cancelled, freeing its slot
    /// for rebooking. Returns false when the booking does not exist, belongs
    /// to someone else, or is past the pending state.
    pub fn cancel_booking(&self, booking_id: i64, user_id: &str) -> Result<bool> {
        let db = self.db.lock().unwrap();
        let changed = db.execute(
            "UPDATE bookings SET status = ?3
             WHERE booking_id = ?1 AND user_id = ?2 AND status = ?4",
            (
                booking_id,
                user_id,
                BookingStatus::Cancelled.as_str(),
                BookingStatus::Pending.as_str(),
            ),
        )?;
        Ok(changed > 0)
    }

    fn read_profile(db: &Connection, user_id: &str) -> Result<DbProfile> {
        db.query_row(
            "SELECT user_id, subscription_tier, enrolled_at, trial_started_at, trial_ends_at
             FROM profiles WHERE user_id = ?1",
            [user_id],
            |row| {
                let tier: String = row.get(1)?;
                Ok(DbProfile {
                    user_id: row.get(0)?,
                    subscription_tier: SubscriptionTier::parse(&tier).ok_or_else(|| {
                        invalid_column(1, format!("unknown subscription tier '{tier}'"))
                    })?,
                    enrolled_at: row.get(2)?,
                    trial_started_at: row.get(3)?,
                    trial_ends_at: row.get(4)?,
                })
            },
        )
    }

    fn booking_from_row(row: &rusqlite::Row<'_>) -> Result<DbBooking> {
        let status: String = row.get(6)?;
        Ok(DbBooking {
            booking_id: row.get(0)?,
            user_id: row.get(1)?,
            session_type: row.get(2)?,
            session_date: row.get(3)?,
            session_time: row.get(4)?,
            notes: row.get(5)?,
            status: BookingStatus::parse(&status)
                .ok_or_else(|| invalid_column(6, format!("unknown booking status '{status}'")))?,
            created_at: row.get(7)?,
        })
    }
}

/// True when `err` is a SQLite uniqueness-constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn invalid_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn first_touch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn slot_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn profile_enrollment_is_set_exactly_once() {
        let db = MemberDb::open_in_memory().unwrap();
        let first = db.get_or_create_profile("user-1", first_touch()).unwrap();
        let second = db
            .get_or_create_profile("user-1", first_touch() + Duration::days(3))
            .unwrap();

        assert_eq!(first.enrolled_at, first_touch());
        assert_eq!(second.enrolled_at, first_touch());
        assert_eq!(second.subscription_tier, SubscriptionTier::Free);
        assert!(second.trial_started_at.is_none());
    }

    #[test]
    fn trial_creation_is_idempotent() {
        let db = MemberDb::open_in_memory().unwrap();
        let first = db.get_or_create_trial("user-1", first_touch()).unwrap();
        let second = db
            .get_or_create_trial("user-1", first_touch() + Duration::hours(5))
            .unwrap();

        assert_eq!(first.started_at, second.started_at);
        assert_eq!(first.ends_at, second.ends_at);
        assert_eq!(first.ends_at - first.started_at, Duration::days(14));
    }

    #[test]
    fn trial_fills_in_on_an_existing_profile() {
        let db = MemberDb::open_in_memory().unwrap();
        db.get_or_create_profile("user-1", first_touch()).unwrap();

        let checked = first_touch() + Duration::days(2);
        let trial = db.get_or_create_trial("user-1", checked).unwrap();
        assert_eq!(trial.started_at, checked);

        // Enrollment predates the trial and is untouched by it.
        let profile = db.get_or_create_profile("user-1", checked).unwrap();
        assert_eq!(profile.enrolled_at, first_touch());
        assert_eq!(profile.trial_started_at, Some(checked));
    }

    #[test]
    fn concurrent_trial_checks_share_one_window() {
        let db = Arc::new(MemberDb::open_in_memory().unwrap());
        let mut handles = Vec::new();
        for offset in 0..4 {
            let db = Arc::clone(&db);
            handles.push(std::thread::spawn(move || {
                db.get_or_create_trial("user-1", first_touch() + Duration::seconds(offset))
                    .unwrap()
            }));
        }

        let windows: Vec<TrialRecord> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for window in &windows {
            assert_eq!(window.started_at, windows[0].started_at);
        }
    }

    #[test]
    fn duplicate_active_slot_is_rejected_at_write_time() {
        let db = MemberDb::open_in_memory().unwrap();
        db.insert_booking("user-1", "coaching", slot_date(), "10:00 AM", None, first_touch())
            .unwrap();

        let err = db
            .insert_booking("user-2", "coaching", slot_date(), "10:00 AM", None, first_touch())
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn different_slots_do_not_conflict() {
        let db = MemberDb::open_in_memory().unwrap();
        db.insert_booking("user-1", "coaching", slot_date(), "10:00 AM", None, first_touch())
            .unwrap();
        db.insert_booking("user-2", "coaching", slot_date(), "11:00 AM", None, first_touch())
            .unwrap();
        db.insert_booking(
            "user-3",
            "coaching",
            slot_date() + Duration::days(1),
            "10:00 AM",
            None,
            first_touch(),
        )
        .unwrap();
    }

    #[test]
    fn cancelled_slot_can_be_rebooked() {
        let db = MemberDb::open_in_memory().unwrap();
        let booking = db
            .insert_booking("user-1", "coaching", slot_date(), "10:00 AM", None, first_touch())
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);

        assert!(db.cancel_booking(booking.booking_id, "user-1").unwrap());
        assert!(db
            .find_active_booking(slot_date(), "10:00 AM")
            .unwrap()
            .is_none());

        let rebooked = db
            .insert_booking("user-2", "coaching", slot_date(), "10:00 AM", None, first_touch())
            .unwrap();
        assert_eq!(rebooked.user_id, "user-2");
    }

    #[test]
    fn cancel_requires_the_owning_member() {
        let db = MemberDb::open_in_memory().unwrap();
        let booking = db
            .insert_booking("user-1", "coaching", slot_date(), "10:00 AM", None, first_touch())
            .unwrap();

        assert!(!db.cancel_booking(booking.booking_id, "user-2").unwrap());
        assert!(db
            .find_active_booking(slot_date(), "10:00 AM")
            .unwrap()
            .is_some());

        assert!(db.cancel_booking(booking.booking_id, "user-1").unwrap());
        // Already cancelled; a second attempt is a no-op.
        assert!(!db.cancel_booking(booking.booking_id, "user-1").unwrap());
    }

    #[test]
    fn find_active_booking_matches_exact_slot() {
        let db = MemberDb::open_in_memory().unwrap();
        db.insert_booking(
            "user-1",
            "coaching",
            slot_date(),
            "10:00 AM",
            Some("first session"),
            first_touch(),
        )
        .unwrap();

        let found = db.find_active_booking(slot_date(), "10:00 AM").unwrap();
        assert_eq!(found.unwrap().notes.as_deref(), Some("first session"));
        assert!(db
            .find_active_booking(slot_date(), "10:30 AM")
            .unwrap()
            .is_none());
    }

    #[test]
    fn bookings_for_user_are_newest_first() {
        let db = MemberDb::open_in_memory().unwrap();
        db.insert_booking("user-1", "coaching", slot_date(), "10:00 AM", None, first_touch())
            .unwrap();
        db.insert_booking(
            "user-1",
            "strategy",
            slot_date() + Duration::days(7),
            "2:00 PM",
            None,
            first_touch(),
        )
        .unwrap();
        db.insert_booking("user-2", "coaching", slot_date(), "3:00 PM", None, first_touch())
            .unwrap();

        let bookings = db.bookings_for_user("user-1").unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].session_type, "strategy");
        assert_eq!(bookings[1].session_type, "coaching");
    }

    #[test]
    fn tier_updates_persist() {
        let db = MemberDb::open_in_memory().unwrap();
        db.get_or_create_profile("user-1", first_touch()).unwrap();
        assert!(db
            .set_subscription_tier("user-1", SubscriptionTier::Mastery)
            .unwrap());

        let profile = db.get_or_create_profile("user-1", first_touch()).unwrap();
        assert_eq!(profile.subscription_tier, SubscriptionTier::Mastery);
        assert!(!db
            .set_subscription_tier("missing", SubscriptionTier::Free)
            .unwrap());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.db");
        let path = path.to_str().unwrap();

        {
            let db = MemberDb::open(path).unwrap();
            db.get_or_create_trial("user-1", first_touch()).unwrap();
            db.insert_booking("user-1", "coaching", slot_date(), "10:00 AM", None, first_touch())
                .unwrap();
        }

        let db = MemberDb::open(path).unwrap();
        let trial = db.get_or_create_trial("user-1", first_touch() + Duration::days(9)).unwrap();
        assert_eq!(trial.started_at, first_touch());
        assert!(db
            .find_active_booking(slot_date(), "10:00 AM")
            .unwrap()
            .is_some());
    }
}
