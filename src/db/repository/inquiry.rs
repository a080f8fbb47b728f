//! Inquiry Repository (留言)

use super::{BaseRepository, CountRow, RepoError, RepoResult, parse_record};
use crate::db::models::{Inquiry, InquiryStatus};
use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "inquiry";

#[derive(Clone)]
pub struct InquiryRepository {
    base: BaseRepository,
}

impl InquiryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, inquiry: Inquiry) -> RepoResult<Inquiry> {
        let created: Option<Inquiry> = self.base.db().create(TABLE).content(inquiry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create inquiry".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Inquiry>> {
        let thing = Self::record(id)?;
        let inquiry: Option<Inquiry> = self.base.db().select(thing).await?;
        Ok(inquiry)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Inquiry>> {
        let inquiries: Vec<Inquiry> = self
            .base
            .db()
            .query("SELECT * FROM inquiry ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(inquiries)
    }

    /// Store the reply text and flip status to Replied
    pub async fn set_reply(&self, id: &RecordId, reply: String) -> RepoResult<Option<Inquiry>> {
        let updated: Option<Inquiry> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({
                "reply": reply,
                "replied_at": Utc::now(),
                "status": InquiryStatus::Replied,
            }))
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Inquiry>> {
        let thing = Self::record(id)?;
        let deleted: Option<Inquiry> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }

    pub async fn count_pending(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM inquiry WHERE status = 'Pending' GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
