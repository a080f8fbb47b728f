//! Billing API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Billing, BillingCreate, BillingItemAdd, NotificationKind, PaymentApply};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/billing - 账单列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Billing>>>> {
    let bills = state.billings().find_all().await?;
    Ok(ok(bills))
}

/// POST /api/billing - 为预订开账单 (每个预订至多一张)
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<BillingCreate>,
) -> AppResult<Json<AppResponse<Billing>>> {
    let booking = state
        .bookings_repo()
        .find_by_id(&req.booking_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", req.booking_id)))?;
    let booking_ref = booking
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Booking record without id"))?;

    let bill = state
        .billings()
        .create(Billing::open(Some(booking_ref), None, Vec::new()))
        .await?;
    Ok(ok(bill))
}

/// GET /api/billing/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Billing>>> {
    let bill = state
        .billings()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bill {id}")))?;
    Ok(ok(bill))
}

/// GET /api/billing/booking/{booking_id} - 按预订查账单
pub async fn get_by_booking(
    State(state): State<ServerState>,
    Path(booking_id): Path<String>,
) -> AppResult<Json<AppResponse<Billing>>> {
    let bill = state
        .billings()
        .find_by_booking(&booking_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bill for booking {booking_id}")))?;
    Ok(ok(bill))
}

/// POST /api/billing/{id}/items - 追加消费条目
pub async fn add_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<BillingItemAdd>,
) -> AppResult<Json<AppResponse<Billing>>> {
    if req.amount <= 0.0 {
        return Err(AppError::validation("Charge amount must be positive"));
    }
    if req.description.trim().is_empty() {
        return Err(AppError::validation("Charge description is required"));
    }
    let mut bill = state
        .billings()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bill {id}")))?;
    bill.append_charge(req.description, req.amount);
    let saved = state.billings().save(&bill).await?;
    Ok(ok(saved))
}

/// POST /api/billing/{id}/payments - 记录收款
pub async fn apply_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<PaymentApply>,
) -> AppResult<Json<AppResponse<Billing>>> {
    if req.amount <= 0.0 {
        return Err(AppError::validation("Payment amount must be positive"));
    }
    let mut bill = state
        .billings()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bill {id}")))?;
    bill.apply_payment(req.amount, req.payment_method);
    let saved = state.billings().save(&bill).await?;

    state
        .notifier
        .notify_staff(
            NotificationKind::PaymentReceived,
            "payment_received",
            format!("Payment of ${:.2} recorded on bill {id}", req.amount),
            serde_json::json!({ "bill_id": id, "amount": req.amount }),
        )
        .await;
    Ok(ok(saved))
}

/// POST /api/billing/{id}/refund - 整单退款标记
///
/// 只修改账本状态；线上支付的实际退款在预订/宴会取消流程中发起。
pub async fn refund(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Billing>>> {
    let mut bill = state
        .billings()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bill {id}")))?;
    bill.mark_refunded();
    let saved = state.billings().save(&bill).await?;
    Ok(ok_with_message(saved, "Bill marked as refunded"))
}
