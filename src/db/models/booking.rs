//! Booking Model

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Booking lifecycle states.
///
/// Transitions are one-directional except a guest cancelling their own
/// booking; CheckedOut, Cancelled and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Rejected,
}

impl BookingStatus {
    /// States that hold the room against new reservations or guest actions
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::CheckedIn
        )
    }

    /// States that count against the room calendar for overlap checks
    pub fn blocks_room(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::CheckedIn)
    }
}

/// Add-on purchased with a stay (breakfast, spa, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingExtra {
    pub name: String,
    pub price: f64,
}

/// Booking entity (预订)
///
/// Stay interval is half-open: `[check_in_date, check_out_date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_amount: f64,
    /// Stripe intent id, kept for refunds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub status: BookingStatus,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub extras: Vec<BookingExtra>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn default_guests() -> u32 {
    1
}

/// Reservation request payload
#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreate {
    pub room: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: Option<u32>,
    #[serde(default)]
    pub extras: Vec<BookingExtra>,
    pub special_requests: Option<String>,
    pub payment_intent_id: Option<String>,
}

/// Quote / payment-intent request payload
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub room: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(default)]
    pub extras: Vec<BookingExtra>,
}

/// A booked interval on a room calendar, public read-only view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedRange {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}
