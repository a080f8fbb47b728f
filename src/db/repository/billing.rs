//! Billing Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record};
use crate::db::models::{Billing, BillingItem, BillingStatus};
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "billing";

#[derive(Debug, Deserialize)]
struct SumRow {
    total: Option<f64>,
}

#[derive(Clone)]
pub struct BillingRepository {
    base: BaseRepository,
}

impl BillingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record(id: &str) -> RepoResult<RecordId> {
        parse_record(TABLE, id)
    }

    /// Create a ledger; fails with Duplicate if one already exists for the
    /// same booking or event
    pub async fn create(&self, bill: Billing) -> RepoResult<Billing> {
        if let Some(booking) = &bill.booking
            && self.find_by_booking_record(booking).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "Bill already exists for this booking".to_string(),
            ));
        }
        if let Some(event) = &bill.event
            && self.find_by_event(event).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "Bill already exists for this event".to_string(),
            ));
        }

        let created: Option<Billing> = self.base.db().create(TABLE).content(bill).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create bill".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Billing>> {
        let thing = Self::record(id)?;
        let bill: Option<Billing> = self.base.db().select(thing).await?;
        Ok(bill)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Billing>> {
        let bills: Vec<Billing> = self
            .base
            .db()
            .query("SELECT * FROM billing ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(bills)
    }

    pub async fn find_by_booking(&self, booking_id: &str) -> RepoResult<Option<Billing>> {
        let booking = parse_record("booking", booking_id)?;
        self.find_by_booking_record(&booking).await
    }

    pub async fn find_by_booking_record(&self, booking: &RecordId) -> RepoResult<Option<Billing>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM billing WHERE booking = $booking LIMIT 1")
            .bind(("booking", booking.clone()))
            .await?;
        let bills: Vec<Billing> = result.take(0)?;
        Ok(bills.into_iter().next())
    }

    pub async fn find_by_event(&self, event: &RecordId) -> RepoResult<Option<Billing>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM billing WHERE event = $event LIMIT 1")
            .bind(("event", event.clone()))
            .await?;
        let bills: Vec<Billing> = result.take(0)?;
        Ok(bills.into_iter().next())
    }

    /// A Paid bill for the event, used by the refund-by-metadata path
    pub async fn find_paid_by_event(&self, event: &RecordId) -> RepoResult<Option<Billing>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM billing WHERE event = $event AND status = 'Paid' LIMIT 1")
            .bind(("event", event.clone()))
            .await?;
        let bills: Vec<Billing> = result.take(0)?;
        Ok(bills.into_iter().next())
    }

    /// Persist ledger mutations (items, totals, status). The ledger state
    /// machine itself lives on the [`Billing`] model.
    pub async fn save(&self, bill: &Billing) -> RepoResult<Billing> {
        let thing = bill
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Bill has no id".to_string()))?;
        let updated: Option<Billing> = self
            .base
            .db()
            .update(thing)
            .merge(serde_json::json!({
                "items": bill.items,
                "total_amount": bill.total_amount,
                "paid_amount": bill.paid_amount,
                "status": bill.status,
                "payment_method": bill.payment_method,
            }))
            .await?;
        updated.ok_or_else(|| RepoError::NotFound("Bill not found".to_string()))
    }

    pub async fn replace_items(
        &self,
        bill: &mut Billing,
        items: Vec<BillingItem>,
        total: f64,
        paid: f64,
        status: BillingStatus,
    ) -> RepoResult<Billing> {
        bill.items = items;
        bill.total_amount = total;
        bill.paid_amount = paid;
        bill.status = status;
        self.save(bill).await
    }

    /// Σ paid_amount over Paid/Partial bills
    pub async fn revenue(&self) -> RepoResult<f64> {
        let rows: Vec<SumRow> = self
            .base
            .db()
            .query(
                "SELECT math::sum(paid_amount) AS total FROM billing \
                 WHERE status IN ['Paid', 'Partial'] GROUP ALL",
            )
            .await?
            .take(0)?;
        Ok(rows.first().and_then(|r| r.total).unwrap_or(0.0))
    }
}
