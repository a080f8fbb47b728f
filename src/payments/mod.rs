//! Payment gateway abstraction
//!
//! Booking and event flows only ever talk to [`PaymentGateway`]; the Stripe
//! implementation lives in [`stripe`] and tests swap in a mock.

pub mod stripe;

use crate::utils::{AppError, AppResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

pub use stripe::StripeGateway;

/// A payment intent as the gateway reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Amount in the currency's minor unit (cents)
    pub amount: i64,
    pub currency: String,
    /// Gateway status string, "succeeded" when the charge went through
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl PaymentIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// Outcome of a refund request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundOutcome {
    Refunded,
    /// The gateway reports the charge was already refunded; treated as
    /// success so reconciliation stays idempotent
    AlreadyRefunded,
}

/// Payment provider seam
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `amount_cents`, tagging it with metadata so it
    /// can be found again by `search_intents`
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        metadata: &[(&str, String)],
    ) -> AppResult<PaymentIntent>;

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent>;

    /// Refund the full charge behind an intent
    async fn refund(&self, intent_id: &str) -> AppResult<RefundOutcome>;

    /// Find succeeded intents carrying `key = value` in their metadata
    async fn search_intents(&self, key: &str, value: &str) -> AppResult<Vec<PaymentIntent>>;
}

/// Convert a dollar amount to integer cents, rounding to the nearest cent
pub fn to_cents(amount: f64) -> AppResult<i64> {
    let d = Decimal::try_from(amount)
        .map_err(|e| AppError::validation(format!("Invalid amount {amount}: {e}")))?;
    (d * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| AppError::validation(format!("Amount out of range: {amount}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cents_rounds() {
        assert_eq!(to_cents(320.0).unwrap(), 32000);
        assert_eq!(to_cents(99.995).unwrap(), 10000);
        assert_eq!(to_cents(0.1).unwrap(), 10);
    }
}
