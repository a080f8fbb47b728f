//! Chat Message Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Direct message between two users (staff/guest chat)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub sender: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub receiver: RecordId,
    pub message: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSend {
    pub receiver: String,
    pub message: String,
}
