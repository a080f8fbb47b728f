//! Contact Inquiry Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InquiryStatus {
    Pending,
    Replied,
}

/// Contact-form inquiry (留言)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: InquiryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Public contact-form payload
#[derive(Debug, Clone, Deserialize)]
pub struct InquiryCreate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Staff reply payload
#[derive(Debug, Clone, Deserialize)]
pub struct InquiryReply {
    pub reply_message: String,
}
