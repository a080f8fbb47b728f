//! Task Repository (工单)

use super::{BaseRepository, CountRow, RepoError, RepoResult, parse_record};
use crate::db::models::{Task, TaskStatus};
use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "task";

#[derive(Clone)]
pub struct TaskRepository {
    base: BaseRepository,
}

impl TaskRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, task: Task) -> RepoResult<Task> {
        let created: Option<Task> = self.base.db().create(TABLE).content(task).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create task".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Task>> {
        let thing = Self::record(id)?;
        let task: Option<Task> = self.base.db().select(thing).await?;
        Ok(task)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Task>> {
        let tasks: Vec<Task> = self
            .base
            .db()
            .query("SELECT * FROM task ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(tasks)
    }

    /// Tasks assigned to one staff member, newest first
    pub async fn find_by_assignee(&self, user: &RecordId) -> RepoResult<Vec<Task>> {
        let tasks: Vec<Task> = self
            .base
            .db()
            .query("SELECT * FROM task WHERE assigned_to = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(tasks)
    }

    pub async fn set_status(&self, id: &RecordId, status: TaskStatus) -> RepoResult<Option<Task>> {
        let mut merge = serde_json::json!({ "status": status });
        if status == TaskStatus::Completed {
            merge["completed_at"] = serde_json::json!(Utc::now());
        }
        let updated: Option<Task> = self.base.db().update(id.clone()).merge(merge).await?;
        Ok(updated)
    }

    pub async fn assign(&self, id: &RecordId, user: &RecordId) -> RepoResult<Option<Task>> {
        let updated: Option<Task> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({ "assigned_to": user }))
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Task>> {
        let thing = Self::record(id)?;
        let deleted: Option<Task> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }

    /// Purge completed tasks, returning the deleted rows
    pub async fn delete_completed(&self) -> RepoResult<Vec<Task>> {
        let deleted: Vec<Task> = self
            .base
            .db()
            .query("DELETE task WHERE status = 'Completed' RETURN BEFORE")
            .await?
            .take(0)?;
        Ok(deleted)
    }

    pub async fn count_pending(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM task WHERE status IN ['Pending', 'InProgress'] GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
