//! Room Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    Single,
    Double,
    Suite,
    Deluxe,
    Penthouse,
}

/// Room status, driven by bookings and housekeeping tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
}

/// Room entity (客房)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub room_number: String,
    pub room_type: RoomType,
    /// Nightly rate in dollars; Decimal arithmetic happens at the quote layer
    pub price_per_night: f64,
    #[serde(default)]
    pub discount: f64,
    pub status: RoomStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Create room payload
#[derive(Debug, Clone, Deserialize)]
pub struct RoomCreate {
    pub room_number: String,
    pub room_type: RoomType,
    pub price_per_night: f64,
    pub discount: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

/// Update room payload (partial)
#[derive(Debug, Clone, Deserialize)]
pub struct RoomUpdate {
    pub room_number: Option<String>,
    pub room_type: Option<RoomType>,
    pub price_per_night: Option<f64>,
    pub discount: Option<f64>,
    pub status: Option<RoomStatus>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}
