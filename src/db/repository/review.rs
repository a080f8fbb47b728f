//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record};
use crate::db::models::{Review, ReviewUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, review: Review) -> RepoResult<Review> {
        if self
            .find_by_room_user(&review.room, &review.user)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(
                "You have already reviewed this room".to_string(),
            ));
        }
        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let thing = Self::record(id)?;
        let review: Option<Review> = self.base.db().select(thing).await?;
        Ok(review)
    }

    pub async fn find_by_room(&self, room: &RecordId) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE room = $room ORDER BY created_at DESC")
            .bind(("room", room.clone()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    pub async fn find_by_room_user(
        &self,
        room: &RecordId,
        user: &RecordId,
    ) -> RepoResult<Option<Review>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE room = $room AND user = $user LIMIT 1")
            .bind(("room", room.clone()))
            .bind(("user", user.clone()))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    pub async fn update(&self, id: &str, patch: ReviewUpdate) -> RepoResult<Option<Review>> {
        let thing = Self::record(id)?;
        let mut merge = serde_json::Map::new();
        if let Some(v) = patch.rating {
            merge.insert("rating".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.comment {
            merge.insert("comment".into(), serde_json::json!(v));
        }
        let updated: Option<Review> = self
            .base
            .db()
            .update(thing)
            .merge(serde_json::Value::Object(merge))
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Review>> {
        let thing = Self::record(id)?;
        let deleted: Option<Review> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }
}
