//! Booking lifecycle (预订流程)
//!
//! The one part of the system with real invariants:
//! - no two Confirmed/CheckedIn bookings on a room may overlap
//! - payment is verified against the gateway before anything is persisted
//! - cancelling/rejecting a paid booking issues a best-effort refund
//!
//! The overlap check is read-then-write with no transactional isolation;
//! two concurrent reservations can both pass it before either commits. The
//! re-check right before commit narrows (not eliminates) that window, the
//! leftover race is resolved out-of-band by a manual refund.

#[cfg(test)]
mod tests;

use crate::db::models::{
    Billing, BillingItem, BookedRange, Booking, BookingCreate, BookingExtra, BookingStatus,
    NotificationKind, Room, RoomStatus,
};
use crate::db::repository::{BillingRepository, BookingRepository, RoomRepository};
use crate::notify::Notifier;
use crate::payments::{PaymentGateway, PaymentIntent, RefundOutcome, to_cents};
use crate::utils::{AppError, AppResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use surrealdb::RecordId;

/// Percentage discount on an amount, rounded to cents
pub fn apply_discount(amount: f64, discount_pct: f64) -> f64 {
    let amount = Decimal::try_from(amount).unwrap_or_default();
    let discount = Decimal::try_from(discount_pct).unwrap_or_default();
    (amount * (Decimal::ONE - discount / Decimal::from(100)))
        .round_dp(2)
        .to_f64()
        .unwrap_or(0.0)
}

/// Price quote for a stay
#[derive(Debug, Clone, serde::Serialize)]
pub struct Quote {
    pub nights: i64,
    pub room_total: f64,
    pub extras_total: f64,
    pub total_amount: f64,
}

pub struct BookingManager {
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
    bookings: BookingRepository,
    billings: BillingRepository,
    rooms: RoomRepository,
}

impl BookingManager {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        notifier: Notifier,
        bookings: BookingRepository,
        billings: BillingRepository,
        rooms: RoomRepository,
    ) -> Self {
        Self {
            gateway,
            notifier,
            bookings,
            billings,
            rooms,
        }
    }

    /// Deterministic price for a stay: `nights × discounted rate + extras`.
    ///
    /// All arithmetic runs on [`Decimal`]; the result is rounded to cents.
    pub fn quote(
        room: &Room,
        check_in: NaiveDate,
        check_out: NaiveDate,
        extras: &[BookingExtra],
    ) -> AppResult<Quote> {
        let nights = (check_out - check_in).num_days();
        if nights <= 0 {
            return Err(AppError::Validation(format!(
                "Invalid date range: {check_in} to {check_out}"
            )));
        }

        let rate = Decimal::try_from(room.price_per_night).unwrap_or_default();
        let discount = Decimal::try_from(room.discount).unwrap_or_default();
        let nightly = rate * (Decimal::ONE - discount / Decimal::from(100));
        let room_total = (nightly * Decimal::from(nights)).round_dp(2);

        let extras_total = extras
            .iter()
            .fold(Decimal::ZERO, |acc, e| {
                acc + Decimal::try_from(e.price).unwrap_or_default()
            })
            .round_dp(2);

        Ok(Quote {
            nights,
            room_total: room_total.to_f64().unwrap_or(0.0),
            extras_total: extras_total.to_f64().unwrap_or(0.0),
            total_amount: (room_total + extras_total).to_f64().unwrap_or(0.0),
        })
    }

    pub async fn find_room(&self, room_id: &str) -> AppResult<Room> {
        self.rooms
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Room {room_id}")))
    }

    /// Create a payment intent for a stay; metadata carries the guest and
    /// room ids so the intent can be traced if its id is ever lost
    pub async fn create_stay_intent(
        &self,
        guest: &RecordId,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        extras: &[BookingExtra],
    ) -> AppResult<(Quote, PaymentIntent)> {
        let room = self.find_room(room_id).await?;
        let quote = Self::quote(&room, check_in, check_out, extras)?;
        let room_ref = room
            .id
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| room_id.to_string());

        let intent = self
            .gateway
            .create_intent(
                to_cents(quote.total_amount)?,
                "usd",
                &[
                    ("guest_id", guest.to_string()),
                    ("room_id", room_ref),
                    ("check_in", check_in.to_string()),
                    ("check_out", check_out.to_string()),
                ],
            )
            .await?;
        Ok((quote, intent))
    }

    /// Reserve a room for a guest.
    ///
    /// Order matters: the gateway is asked for the intent's real status
    /// first (no local state is trusted), then duplicate and overlap checks
    /// run immediately before the write.
    pub async fn reserve(&self, guest: RecordId, req: BookingCreate) -> AppResult<Booking> {
        let room = self.find_room(&req.room).await?;
        let room_ref = room
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Room record without id"))?;
        let quote = Self::quote(&room, req.check_in_date, req.check_out_date, &req.extras)?;

        // 1. Payment must have gone through
        let intent_id = req
            .payment_intent_id
            .ok_or_else(|| AppError::Validation("payment_intent_id is required".to_string()))?;
        let intent = self.gateway.retrieve_intent(&intent_id).await?;
        if !intent.is_succeeded() {
            return Err(AppError::BusinessRule(format!(
                "Payment not verified: intent {intent_id} is '{}'",
                intent.status
            )));
        }

        // 2. One active booking per guest and room
        if self
            .bookings
            .find_active_for_user_room(&guest, &room_ref)
            .await?
            .is_some()
        {
            return Err(AppError::Duplicate(
                "You already hold an active booking for this room".to_string(),
            ));
        }

        // 3. Overlap re-check right before commit
        if let Some(existing) = self
            .bookings
            .find_overlapping(&room_ref, req.check_in_date, req.check_out_date)
            .await?
        {
            tracing::warn!(
                target: "booking",
                room = %room.room_number,
                existing = %existing.check_in_date,
                "overlapping reservation rejected"
            );
            return Err(AppError::BusinessRule(format!(
                "Room {} is unavailable for the requested dates",
                room.room_number
            )));
        }

        let booking = self
            .bookings
            .create(Booking {
                id: None,
                user: guest.clone(),
                room: room_ref,
                check_in_date: req.check_in_date,
                check_out_date: req.check_out_date,
                total_amount: quote.total_amount,
                payment_intent_id: Some(intent_id),
                status: BookingStatus::Confirmed,
                guests: req.guests.unwrap_or(1),
                extras: req.extras,
                special_requests: req.special_requests,
                created_at: chrono::Utc::now(),
            })
            .await?;

        // Matching paid ledger: the room charge plus one line per extra
        let mut items = vec![BillingItem::new(
            format!("Room Charge ({} nights)", quote.nights),
            quote.room_total,
        )];
        for extra in &booking.extras {
            items.push(BillingItem::new(extra.name.clone(), extra.price));
        }
        let mut bill = Billing::open(booking.id.clone(), None, items);
        bill.apply_payment(quote.total_amount, "card");
        self.billings.create(bill).await?;

        let booking_ref = booking.id.as_ref().map(|r| r.to_string());
        self.notifier
            .notify_staff(
                NotificationKind::Booking,
                "new_booking",
                format!(
                    "New booking for room {} ({} to {})",
                    room.room_number, booking.check_in_date, booking.check_out_date
                ),
                serde_json::json!({
                    "booking_id": booking_ref,
                    "room_number": room.room_number,
                }),
            )
            .await;

        Ok(booking)
    }

    /// Move a booking to `requested`, syncing room status and issuing a
    /// best-effort refund when a paid booking dies.
    ///
    /// Guests may only cancel their own booking; any other transition by a
    /// guest is refused.
    pub async fn transition(
        &self,
        booking_id: &str,
        requested: BookingStatus,
        actor_id: &str,
        actor_is_guest: bool,
    ) -> AppResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id}")))?;

        if actor_is_guest {
            if booking.user.to_string() != actor_id {
                return Err(AppError::forbidden("You may only modify your own booking"));
            }
            if requested != BookingStatus::Cancelled {
                return Err(AppError::forbidden(
                    "Guests may only cancel their own booking",
                ));
            }
        }

        let today = chrono::Local::now().date_naive();
        match requested {
            BookingStatus::Confirmed | BookingStatus::CheckedIn => {
                // Only flip the room while the stay window is actually open
                if booking.check_in_date <= today && today < booking.check_out_date {
                    self.rooms
                        .set_status(&booking.room, RoomStatus::Occupied)
                        .await?;
                }
                if requested == BookingStatus::CheckedIn {
                    self.notifier
                        .notify_staff(
                            NotificationKind::CheckIn,
                            "check_in",
                            format!("Guest checked in to booking {booking_id}"),
                            serde_json::json!({ "booking_id": booking_id }),
                        )
                        .await;
                }
            }
            BookingStatus::CheckedOut | BookingStatus::Cancelled | BookingStatus::Rejected => {
                self.rooms
                    .set_status(&booking.room, RoomStatus::Available)
                    .await?;
                if requested == BookingStatus::CheckedOut {
                    self.notifier
                        .notify_staff(
                            NotificationKind::CheckOut,
                            "check_out",
                            format!("Guest checked out of booking {booking_id}"),
                            serde_json::json!({ "booking_id": booking_id }),
                        )
                        .await;
                }
            }
            BookingStatus::Pending => {}
        }

        if matches!(
            requested,
            BookingStatus::Cancelled | BookingStatus::Rejected
        ) {
            self.refund_booking_best_effort(&booking).await;
        }

        let updated = self.bookings.set_status(booking_id, requested).await?;
        Ok(updated)
    }

    /// Public room calendar: every interval held by an active booking
    pub async fn unavailable_ranges(&self, room_id: &str) -> AppResult<Vec<BookedRange>> {
        let room = self.find_room(room_id).await?;
        let room_ref = room
            .id
            .ok_or_else(|| AppError::internal("Room record without id"))?;
        Ok(self.bookings.unavailable_ranges(&room_ref).await?)
    }

    /// Refund the payment behind a dying booking.
    ///
    /// Every booking created through [`reserve`](Self::reserve) carries its
    /// intent id, so that is the only lookup needed here. "Already refunded"
    /// counts as success so reconciliation stays idempotent. Failure is
    /// logged and swallowed: the status transition must proceed, the gap is
    /// closed manually.
    async fn refund_booking_best_effort(&self, booking: &Booking) {
        let booking_ref = match &booking.id {
            Some(id) => id.to_string(),
            None => return,
        };

        let Some(intent_id) = booking.payment_intent_id.clone() else {
            tracing::warn!(target: "payments", booking = %booking_ref, "no payment intent on record, nothing to refund");
            return;
        };

        match self.gateway.refund(&intent_id).await {
            Ok(outcome) => {
                if outcome == RefundOutcome::AlreadyRefunded {
                    tracing::info!(target: "payments", booking = %booking_ref, "charge already refunded, reconciling local state");
                }
                if let Err(e) = self.mark_bill_refunded(booking).await {
                    tracing::error!(target: "payments", booking = %booking_ref, error = %e, "refund succeeded but billing update failed");
                }
                self.notifier
                    .notify_staff(
                        NotificationKind::PaymentReversed,
                        "payment_reversed",
                        format!("Refund issued for booking {booking_ref}"),
                        serde_json::json!({ "booking_id": booking_ref }),
                    )
                    .await;
            }
            Err(e) => {
                // Billing status deliberately left unchanged
                tracing::error!(target: "payments", booking = %booking_ref, error = %e, "refund failed, manual reconciliation required");
            }
        }
    }

    async fn mark_bill_refunded(&self, booking: &Booking) -> AppResult<()> {
        let Some(booking_ref) = &booking.id else {
            return Ok(());
        };
        if let Some(mut bill) = self.billings.find_by_booking_record(booking_ref).await? {
            bill.mark_refunded();
            self.billings.save(&bill).await?;
        }
        Ok(())
    }
}
