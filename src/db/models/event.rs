//! Event Model (banquets, weddings, corporate functions)

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Wedding,
    Corporate,
    Social,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl EventStatus {
    /// At most one active inquiry may exist per contact email
    pub fn is_active(&self) -> bool {
        matches!(self, EventStatus::Pending | EventStatus::Confirmed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Event inquiry entity (宴会预约)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Set when the inquiry came from a logged-in user
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user: Option<RecordId>,
    pub event_type: EventType,
    pub date: NaiveDate,
    pub guests: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub contact_info: ContactInfo,
    pub status: EventStatus,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub discount: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Create event inquiry payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub event_type: EventType,
    pub date: NaiveDate,
    pub guests: u32,
    pub requirements: Option<String>,
    pub contact_info: ContactInfo,
    pub cost: Option<f64>,
    pub discount: Option<f64>,
}

/// Invoice payload: sets the event cost and (re)builds its bill
#[derive(Debug, Clone, Deserialize)]
pub struct EventInvoice {
    pub amount: f64,
    pub discount: Option<f64>,
    #[serde(default)]
    pub mark_as_paid: bool,
}
