//! Chat Message Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record};
use crate::db::models::Message;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "message";

#[derive(Clone)]
pub struct MessageRepository {
    base: BaseRepository,
}

impl MessageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, message: Message) -> RepoResult<Message> {
        let created: Option<Message> = self.base.db().create(TABLE).content(message).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create message".to_string()))
    }

    /// Full history between two users, both directions, oldest first
    pub async fn history(&self, a: &RecordId, b: &RecordId) -> RepoResult<Vec<Message>> {
        let messages: Vec<Message> = self
            .base
            .db()
            .query(
                "SELECT * FROM message WHERE \
                 (sender = $a AND receiver = $b) OR (sender = $b AND receiver = $a) \
                 ORDER BY created_at ASC",
            )
            .bind(("a", a.clone()))
            .bind(("b", b.clone()))
            .await?
            .take(0)?;
        Ok(messages)
    }

    /// Mark everything `from` sent `to` as read
    pub async fn mark_read(&self, from: &RecordId, to: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE message SET read = true \
                 WHERE sender = $from AND receiver = $to AND read = false",
            )
            .bind(("from", from.clone()))
            .bind(("to", to.clone()))
            .await?;
        Ok(())
    }
}
