//! Booking Repository
//!
//! The overlap and duplicate-booking checks live here as plain queries; the
//! read-then-write race between two concurrent reservations is accepted and
//! documented at the manager level.

use super::{BaseRepository, CountRow, RepoError, RepoResult, parse_record};
use crate::db::models::{BookedRange, Booking, BookingStatus};
use chrono::NaiveDate;
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "booking";

/// Booking search projection (guest name / room number resolved via links)
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct BookingSearchHit {
    #[serde(default, with = "crate::db::models::serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub status: BookingStatus,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guest: Option<String>,
    pub room_number: Option<String>,
}

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing = Self::record(id)?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// All bookings, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Bookings of one guest, newest first
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// An active (Pending/Confirmed/CheckedIn) booking this guest already
    /// holds for the room, if any
    pub async fn find_active_for_user_room(
        &self,
        user: &RecordId,
        room: &RecordId,
    ) -> RepoResult<Option<Booking>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE user = $user AND room = $room \
                 AND status IN ['Pending', 'Confirmed', 'CheckedIn'] LIMIT 1",
            )
            .bind(("user", user.clone()))
            .bind(("room", room.clone()))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// First Confirmed/CheckedIn booking overlapping `[start, end)` on the
    /// room, if any. Half-open interval test:
    /// `existing.check_in < end AND existing.check_out > start`.
    pub async fn find_overlapping(
        &self,
        room: &RecordId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Option<Booking>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE room = $room \
                 AND status IN ['Confirmed', 'CheckedIn'] \
                 AND check_in_date < $end AND check_out_date > $start LIMIT 1",
            )
            .bind(("room", room.clone()))
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// Booked intervals for a room calendar (Pending counts too: a pending
    /// stay may still convert)
    pub async fn unavailable_ranges(&self, room: &RecordId) -> RepoResult<Vec<BookedRange>> {
        let ranges: Vec<BookedRange> = self
            .base
            .db()
            .query(
                "SELECT check_in_date, check_out_date FROM booking WHERE room = $room \
                 AND status IN ['Pending', 'Confirmed', 'CheckedIn']",
            )
            .bind(("room", room.clone()))
            .await?
            .take(0)?;
        Ok(ranges)
    }

    pub async fn set_status(&self, id: &str, status: BookingStatus) -> RepoResult<Booking> {
        let thing = Self::record(id)?;
        let updated: Option<Booking> = self
            .base
            .db()
            .update(thing)
            .merge(serde_json::json!({ "status": status }))
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing = Self::record(id)?;
        let deleted: Option<Booking> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM booking GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Arrivals scheduled for `date` that are still live
    pub async fn count_check_ins_on(&self, date: NaiveDate) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM booking WHERE check_in_date = $date \
                 AND status IN ['Confirmed', 'CheckedIn'] GROUP ALL",
            )
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Departures scheduled for `date`
    pub async fn count_check_outs_on(&self, date: NaiveDate) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM booking WHERE check_out_date = $date \
                 AND status IN ['CheckedIn', 'CheckedOut'] GROUP ALL",
            )
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Substring search across guest name, room number and status via record
    /// links; `q` must already be lowercased
    pub async fn search(&self, q: &str, limit: usize) -> RepoResult<Vec<BookingSearchHit>> {
        let hits: Vec<BookingSearchHit> = self
            .base
            .db()
            .query(
                "SELECT id, status, check_in_date, check_out_date, \
                 user.username AS guest, room.room_number AS room_number \
                 FROM booking WHERE \
                 string::contains(string::lowercase(user.username ?? ''), $q) OR \
                 string::contains(string::lowercase(user.email ?? ''), $q) OR \
                 string::contains(string::lowercase(room.room_number ?? ''), $q) OR \
                 string::contains(string::lowercase(<string> status), $q) \
                 LIMIT $limit",
            )
            .bind(("q", q.to_string()))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(hits)
    }
}
