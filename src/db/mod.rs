//! Database Module
//!
//! Embedded SurrealDB storage. RocksDB-backed for the running server, pure
//! in-memory for tests.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Uniqueness constraints live in the database, not in application code:
/// room numbers, usernames/emails, and the one-review-per-guest-per-room rule.
const SCHEMA: &str = "
    DEFINE INDEX IF NOT EXISTS uniq_room_number ON TABLE room COLUMNS room_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS uniq_username ON TABLE user COLUMNS username UNIQUE;
    DEFINE INDEX IF NOT EXISTS uniq_user_email ON TABLE user COLUMNS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS uniq_review_room_user ON TABLE review COLUMNS room, user UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_booking_room ON TABLE booking COLUMNS room;
    DEFINE INDEX IF NOT EXISTS idx_booking_user ON TABLE booking COLUMNS user;
    DEFINE INDEX IF NOT EXISTS idx_booking_status ON TABLE booking COLUMNS status;
";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns("luxurystay")
            .use_db("hms")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database ready (embedded SurrealDB)");
        Ok(Self { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_rocksdb_at_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data");
        let service = DbService::new(path.to_str().expect("utf-8 path"))
            .await
            .expect("open database");
        service.db.query("INFO FOR DB").await.expect("query");
    }

    #[derive(Debug, serde::Deserialize)]
    struct UserRow {
        id: surrealdb::RecordId,
        email: String,
    }

    #[tokio::test]
    async fn unique_email_index_rejects_duplicates() {
        let service = DbService::memory().await.expect("in-memory db");

        let first: Option<UserRow> = service
            .db
            .create("user")
            .content(serde_json::json!({ "username": "alice", "email": "a@b.c" }))
            .await
            .expect("first insert");
        let first = first.expect("created row");
        assert_eq!(first.id.table(), "user");
        assert_eq!(first.email, "a@b.c");

        let second: Result<Option<UserRow>, _> = service
            .db
            .create("user")
            .content(serde_json::json!({ "username": "bob", "email": "a@b.c" }))
            .await;
        assert!(second.is_err(), "uniq_user_email must reject the duplicate");
    }
}
