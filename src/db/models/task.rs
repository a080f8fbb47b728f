//! Housekeeping Task Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Cleaning,
    Maintenance,
    Inspection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

/// Housekeeping / maintenance task (工单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub assigned_to: Option<RecordId>,
    pub description: String,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Guest or staff member who reported the issue
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub reported_by: Option<RecordId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Create task payload
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreate {
    pub room: String,
    pub description: String,
    pub task_type: Option<TaskType>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
}

/// Update task payload (status / assignment)
#[derive(Debug, Clone, Deserialize)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
}
