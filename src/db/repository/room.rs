//! Room Repository (客房)

use super::{BaseRepository, RepoError, RepoResult, parse_record};
use crate::db::models::{Room, RoomStatus, RoomUpdate};
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "room";

#[derive(Debug, Deserialize)]
struct StatusCountRow {
    status: RoomStatus,
    count: i64,
}

#[derive(Clone)]
pub struct RoomRepository {
    base: BaseRepository,
}

impl RoomRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, room: Room) -> RepoResult<Room> {
        if self.find_by_number(&room.room_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Room number {} already exists",
                room.room_number
            )));
        }
        let created: Option<Room> = self.base.db().create(TABLE).content(room).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create room".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Room>> {
        let thing = Self::record(id)?;
        let room: Option<Room> = self.base.db().select(thing).await?;
        Ok(room)
    }

    pub async fn find_by_number(&self, room_number: &str) -> RepoResult<Option<Room>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM room WHERE room_number = $room_number LIMIT 1")
            .bind(("room_number", room_number.to_string()))
            .await?;
        let rooms: Vec<Room> = result.take(0)?;
        Ok(rooms.into_iter().next())
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Room>> {
        let rooms: Vec<Room> = self
            .base
            .db()
            .query("SELECT * FROM room ORDER BY room_number ASC")
            .await?
            .take(0)?;
        Ok(rooms)
    }

    /// Partial update; only the provided fields are merged
    pub async fn update(&self, id: &str, patch: RoomUpdate) -> RepoResult<Option<Room>> {
        let thing = Self::record(id)?;
        if let Some(number) = &patch.room_number
            && let Some(existing) = self.find_by_number(number).await?
            && existing.id.as_ref() != Some(&thing)
        {
            return Err(RepoError::Duplicate(format!(
                "Room number {number} already exists"
            )));
        }
        let mut merge = serde_json::Map::new();
        if let Some(v) = patch.room_number {
            merge.insert("room_number".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.room_type {
            merge.insert("room_type".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.price_per_night {
            merge.insert("price_per_night".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.discount {
            merge.insert("discount".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.status {
            merge.insert("status".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.description {
            merge.insert("description".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.amenities {
            merge.insert("amenities".into(), serde_json::json!(v));
        }
        if let Some(v) = patch.images {
            merge.insert("images".into(), serde_json::json!(v));
        }
        let updated: Option<Room> = self
            .base
            .db()
            .update(thing)
            .merge(serde_json::Value::Object(merge))
            .await?;
        Ok(updated)
    }

    pub async fn set_status(&self, id: &RecordId, status: RoomStatus) -> RepoResult<Option<Room>> {
        let updated: Option<Room> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({ "status": status }))
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Room>> {
        let thing = Self::record(id)?;
        let deleted: Option<Room> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM room GROUP ALL")
            .await?;
        let rows: Vec<super::CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Room counts keyed by status, for the dashboard
    pub async fn count_by_status(&self) -> RepoResult<Vec<(RoomStatus, i64)>> {
        let mut result = self
            .base
            .db()
            .query("SELECT status, count() FROM room GROUP BY status")
            .await?;
        let rows: Vec<StatusCountRow> = result.take(0)?;
        Ok(rows.into_iter().map(|r| (r.status, r.count)).collect())
    }

    /// Case-insensitive substring match on room number and description
    pub async fn search(&self, term: &str) -> RepoResult<Vec<Room>> {
        let rooms: Vec<Room> = self
            .base
            .db()
            .query(
                "SELECT * FROM room WHERE \
                 string::contains(string::lowercase(room_number), $q) \
                 OR string::contains(string::lowercase(description ?? ''), $q)",
            )
            .bind(("q", term.to_lowercase()))
            .await?
            .take(0)?;
        Ok(rooms)
    }
}
