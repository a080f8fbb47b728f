//! Notification Model
//!
//! Persisted copy of every staff-facing push event, so the dashboard bell
//! works for staff who were offline when the event fired.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Kind of event a notification records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Booking,
    Event,
    Inquiry,
    CheckIn,
    CheckOut,
    PaymentReceived,
    PaymentReversed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub kind: NotificationKind,
    pub message: String,
    /// Related ids or small details
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: None,
            kind,
            message: message.into(),
            data,
            is_read: false,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Mark-as-read payload; without an id all unread notifications are marked
#[derive(Debug, Clone, Deserialize)]
pub struct MarkRead {
    pub id: Option<String>,
}
