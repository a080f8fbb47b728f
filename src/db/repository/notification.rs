//! Notification Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record};
use crate::db::models::Notification;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> =
            self.base.db().create(TABLE).content(notification).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// Most recent 50 notifications for the dashboard bell
    pub async fn find_recent(&self) -> RepoResult<Vec<Notification>> {
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query("SELECT * FROM notification ORDER BY created_at DESC LIMIT 50")
            .await?
            .take(0)?;
        Ok(notifications)
    }

    pub async fn mark_read(&self, id: &str) -> RepoResult<Option<Notification>> {
        let thing = Self::record(id)?;
        let updated: Option<Notification> = self
            .base
            .db()
            .update(thing)
            .merge(serde_json::json!({ "is_read": true }))
            .await?;
        Ok(updated)
    }

    pub async fn mark_all_read(&self) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE notification SET is_read = true WHERE is_read = false")
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Notification>> {
        let thing = Self::record(id)?;
        let deleted: Option<Notification> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }

    pub async fn delete_all(&self) -> RepoResult<()> {
        let _: Vec<Notification> = self.base.db().delete(TABLE).await?;
        Ok(())
    }
}
