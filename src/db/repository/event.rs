//! Event Repository (宴会预约)

use super::{BaseRepository, CountRow, RepoError, RepoResult, parse_record};
use crate::db::models::{Event, EventStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "event";

#[derive(Clone)]
pub struct EventRepository {
    base: BaseRepository,
}

impl EventRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    pub async fn create(&self, event: Event) -> RepoResult<Event> {
        if self
            .find_active_by_contact_email(&event.contact_info.email)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(
                "An active event inquiry already exists for this contact".to_string(),
            ));
        }
        let created: Option<Event> = self.base.db().create(TABLE).content(event).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create event".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Event>> {
        let thing = Self::record(id)?;
        let event: Option<Event> = self.base.db().select(thing).await?;
        Ok(event)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Event>> {
        let events: Vec<Event> = self
            .base
            .db()
            .query("SELECT * FROM event ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(events)
    }

    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Event>> {
        let events: Vec<Event> = self
            .base
            .db()
            .query("SELECT * FROM event WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(events)
    }

    /// Pending/Confirmed inquiry held by this contact email, if any
    pub async fn find_active_by_contact_email(&self, email: &str) -> RepoResult<Option<Event>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM event WHERE contact_info.email = $email \
                 AND status IN ['Pending', 'Confirmed'] LIMIT 1",
            )
            .bind(("email", email.to_string()))
            .await?;
        let events: Vec<Event> = result.take(0)?;
        Ok(events.into_iter().next())
    }

    pub async fn set_status(&self, id: &RecordId, status: EventStatus) -> RepoResult<Option<Event>> {
        let updated: Option<Event> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({ "status": status }))
            .await?;
        Ok(updated)
    }

    /// Record the invoiced amounts on the event itself
    pub async fn set_invoice(
        &self,
        id: &RecordId,
        cost: f64,
        discount: f64,
    ) -> RepoResult<Option<Event>> {
        let updated: Option<Event> = self
            .base
            .db()
            .update(id.clone())
            .merge(serde_json::json!({ "cost": cost, "discount": discount }))
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Event>> {
        let thing = Self::record(id)?;
        let deleted: Option<Event> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM event GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Case-insensitive substring match on contact name and email
    pub async fn search(&self, term: &str) -> RepoResult<Vec<Event>> {
        let events: Vec<Event> = self
            .base
            .db()
            .query(
                "SELECT * FROM event WHERE \
                 string::contains(string::lowercase(contact_info.name), $q) \
                 OR string::contains(string::lowercase(contact_info.email), $q)",
            )
            .bind(("q", term.to_lowercase()))
            .await?
            .take(0)?;
        Ok(events)
    }
}
