//! Repository Module
//!
//! CRUD operations over the document collections. One repository per
//! collection, all built on [`BaseRepository`].
//!
//! # ID Convention
//!
//! 全栈统一使用 "table:id" 格式。API clients may also send the bare key;
//! [`parse_record`] normalizes both forms into a [`RecordId`].

pub mod billing;
pub mod booking;
pub mod event;
pub mod inquiry;
pub mod message;
pub mod notification;
pub mod review;
pub mod room;
pub mod task;
pub mod user;

pub use billing::BillingRepository;
pub use booking::{BookingRepository, BookingSearchHit};
pub use event::EventRepository;
pub use inquiry::InquiryRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use review::ReviewRepository;
pub use room::RoomRepository;
pub use task::TaskRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Row shape of `SELECT count() ... GROUP ALL`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub count: i64,
}

/// Parse an id for `table`, accepting "table:key" or a bare key
pub fn parse_record(table: &str, id: &str) -> RepoResult<RecordId> {
    if let Some((tb, key)) = id.split_once(':') {
        if tb != table {
            return Err(RepoError::Validation(format!(
                "Expected {table} id, got: {id}"
            )));
        }
        Ok(RecordId::from_table_key(tb, key))
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
