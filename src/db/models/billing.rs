//! Billing Model
//!
//! One ledger record per booking (or per event). Charge line items accumulate
//! into `total_amount`; payments accumulate into `paid_amount`; `status` is
//! derived from paid vs total except for the explicit Refunded state.

use super::serde_helpers;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
}

/// A single charge line on a bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingItem {
    pub description: String,
    pub amount: f64,
    pub date: chrono::DateTime<chrono::Utc>,
}

impl BillingItem {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount,
            date: chrono::Utc::now(),
        }
    }
}

/// Billing ledger entity (账单)
///
/// Exactly one of `booking` / `event` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Billing {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub booking: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub event: Option<RecordId>,
    pub items: Vec<BillingItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub paid_amount: f64,
    pub status: BillingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn dec(v: f64) -> Decimal {
    Decimal::try_from(v).unwrap_or_default()
}

fn to_f64(v: Decimal) -> f64 {
    v.round_dp(2).to_f64().unwrap_or(0.0)
}

impl Billing {
    /// Open a new ledger for a booking or an event
    pub fn open(
        booking: Option<RecordId>,
        event: Option<RecordId>,
        items: Vec<BillingItem>,
    ) -> Self {
        let total = items.iter().fold(Decimal::ZERO, |acc, i| acc + dec(i.amount));
        Self {
            id: None,
            booking,
            event,
            items,
            total_amount: to_f64(total),
            paid_amount: 0.0,
            status: BillingStatus::Pending,
            payment_method: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Append a charge line and grow the total.
    ///
    /// A fully Paid bill downgrades to Partial: new charges invalidate the
    /// full-payment state.
    pub fn append_charge(&mut self, description: impl Into<String>, amount: f64) {
        self.items.push(BillingItem::new(description, amount));
        self.total_amount = to_f64(dec(self.total_amount) + dec(amount));
        if self.status == BillingStatus::Paid {
            self.status = BillingStatus::Partial;
        }
    }

    /// Record a payment. `paid_amount` only ever grows here; status becomes
    /// Paid once paid covers total, Partial otherwise.
    pub fn apply_payment(&mut self, amount: f64, method: impl Into<String>) {
        self.paid_amount = to_f64(dec(self.paid_amount) + dec(amount));
        self.payment_method = Some(method.into());
        self.status = if dec(self.paid_amount) >= dec(self.total_amount) {
            BillingStatus::Paid
        } else {
            BillingStatus::Partial
        };
    }

    /// Refund is all-or-nothing at the ledger level, regardless of
    /// partial-payment history. Idempotent.
    pub fn mark_refunded(&mut self) {
        self.status = BillingStatus::Refunded;
        self.paid_amount = 0.0;
    }
}

/// Create bill payload
#[derive(Debug, Clone, Deserialize)]
pub struct BillingCreate {
    pub booking_id: String,
}

/// Append charge payload
#[derive(Debug, Clone, Deserialize)]
pub struct BillingItemAdd {
    pub description: String,
    pub amount: f64,
}

/// Payment payload
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentApply {
    pub amount: f64,
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(total: f64) -> Billing {
        Billing::open(None, None, vec![BillingItem::new("Room Charge", total)])
    }

    #[test]
    fn payment_progression_partial_then_paid() {
        let mut b = bill(500.0);
        b.apply_payment(300.0, "Cash");
        assert_eq!(b.status, BillingStatus::Partial);
        assert_eq!(b.paid_amount, 300.0);

        b.apply_payment(200.0, "Card");
        assert_eq!(b.status, BillingStatus::Paid);
        assert_eq!(b.paid_amount, 500.0);
    }

    #[test]
    fn overpayment_is_paid() {
        let mut b = bill(100.0);
        b.apply_payment(150.0, "Cash");
        assert_eq!(b.status, BillingStatus::Paid);
    }

    #[test]
    fn new_charge_downgrades_paid_to_partial() {
        let mut b = bill(100.0);
        b.apply_payment(100.0, "Cash");
        assert_eq!(b.status, BillingStatus::Paid);

        b.append_charge("Mini Bar", 25.0);
        assert_eq!(b.status, BillingStatus::Partial);
        assert_eq!(b.total_amount, 125.0);
        // paid amount untouched by charges
        assert_eq!(b.paid_amount, 100.0);
    }

    #[test]
    fn refund_resets_paid_and_is_idempotent() {
        let mut b = bill(200.0);
        b.apply_payment(200.0, "Stripe");
        b.mark_refunded();
        assert_eq!(b.status, BillingStatus::Refunded);
        assert_eq!(b.paid_amount, 0.0);

        b.mark_refunded();
        assert_eq!(b.status, BillingStatus::Refunded);
        assert_eq!(b.paid_amount, 0.0);
    }

    #[test]
    fn open_totals_items() {
        let b = Billing::open(
            None,
            None,
            vec![
                BillingItem::new("Room Charge (3 nights)", 300.0),
                BillingItem::new("Extra: Breakfast", 20.0),
            ],
        );
        assert_eq!(b.total_amount, 320.0);
        assert_eq!(b.status, BillingStatus::Pending);
    }
}
