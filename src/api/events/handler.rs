//! Event API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    http::header::AUTHORIZATION,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::models::{
    Billing, BillingItem, Event, EventCreate, EventInvoice, EventStatus, NotificationKind,
};
use crate::db::repository::UserRepository;
use crate::payments::{RefundOutcome, to_cents};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: EventStatus,
}

#[derive(Debug, Serialize)]
pub struct EventIntentResponse {
    pub amount: f64,
    pub payment_intent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentConfirm {
    pub payment_intent_id: String,
}

/// POST /api/events - 提交宴会预约 (公共表单)
///
/// 带有效 token 的请求会把预约挂到该用户名下，匿名提交只留联系方式。
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<EventCreate>,
) -> AppResult<Json<AppResponse<Event>>> {
    if req.guests == 0 {
        return Err(AppError::validation("Guest count must be at least 1"));
    }
    if req.date < Utc::now().date_naive() {
        return Err(AppError::validation("Event date cannot be in the past"));
    }
    if req.contact_info.email.trim().is_empty() || !req.contact_info.email.contains('@') {
        return Err(AppError::validation("A valid contact email is required"));
    }

    let user = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .and_then(|t| state.jwt_service.validate_token(t).ok())
        .and_then(|c| CurrentUser::try_from(c).ok())
        .and_then(|u| UserRepository::record(&u.id).ok());

    let event = Event {
        id: None,
        user,
        event_type: req.event_type,
        date: req.date,
        guests: req.guests,
        requirements: req.requirements,
        contact_info: req.contact_info,
        status: EventStatus::Pending,
        cost: req.cost.unwrap_or(0.0),
        discount: req.discount.unwrap_or(0.0),
        created_at: Utc::now(),
    };
    let created = state.events().create(event).await?;

    let event_id = created.id.as_ref().map(|id| id.to_string());
    state
        .notifier
        .notify_staff(
            NotificationKind::Event,
            "new_event",
            format!(
                "New {:?} inquiry from {} for {}",
                created.event_type, created.contact_info.name, created.date
            ),
            serde_json::json!({ "event_id": event_id }),
        )
        .await;

    Ok(ok(created))
}

/// GET /api/events - 全部预约 (员工)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Event>>>> {
    let events = state.events().find_all().await?;
    Ok(ok(events))
}

/// GET /api/events/my - 当前用户的预约
pub async fn my_events(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Event>>>> {
    let record = UserRepository::record(&user.id)?;
    let events = state.events().find_by_user(&record).await?;
    Ok(ok(events))
}

/// GET /api/events/{id} - 本人或员工可见
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Event>>> {
    let event = state
        .events()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;

    if !user.has_permission("events:manage")
        && event.user.as_ref().map(|r| r.to_string()) != Some(user.id.clone())
    {
        return Err(AppError::forbidden("You may only view your own event"));
    }
    Ok(ok(event))
}

/// POST /api/events/{id}/pay - 为已开票的预约创建支付意向
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<EventIntentResponse>>> {
    let event = state
        .events()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    let event_ref = event
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Event record without id"))?;

    let amount = crate::booking::apply_discount(event.cost, event.discount);
    if amount <= 0.0 {
        return Err(AppError::validation("Event has not been invoiced yet"));
    }

    let intent = state
        .gateway
        .create_intent(
            to_cents(amount)?,
            "usd",
            &[
                ("event_id", event_ref.key().to_string()),
                ("user_id", user.id.clone()),
            ],
        )
        .await?;

    Ok(ok(EventIntentResponse {
        amount,
        payment_intent_id: intent.id,
        client_secret: intent.client_secret,
    }))
}

/// POST /api/events/{id}/confirm-payment - 核验支付并确认预约
///
/// 以网关返回的意向状态为准，本地不做任何假设。
pub async fn confirm_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<PaymentConfirm>,
) -> AppResult<Json<AppResponse<Event>>> {
    let event = state
        .events()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    let event_ref = event
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Event record without id"))?;

    let intent = state.gateway.retrieve_intent(&req.payment_intent_id).await?;
    if !intent.is_succeeded() {
        return Err(AppError::BusinessRule(format!(
            "Payment not verified: intent {} is '{}'",
            req.payment_intent_id, intent.status
        )));
    }

    let mut bill = state
        .billings()
        .find_by_event(&event_ref)
        .await?
        .ok_or_else(|| AppError::validation("Event has not been invoiced yet"))?;
    let paid = intent.amount as f64 / 100.0;
    bill.apply_payment(paid, "Stripe");
    state.billings().save(&bill).await?;

    let updated = state
        .events()
        .set_status(&event_ref, EventStatus::Confirmed)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;

    state
        .notifier
        .notify_staff(
            NotificationKind::PaymentReceived,
            "payment_received",
            format!(
                "Payment of ${paid:.2} received for event {}",
                event_ref.key()
            ),
            serde_json::json!({ "event_id": event_ref.to_string(), "intent_id": intent.id }),
        )
        .await;

    Ok(ok(updated))
}

/// PUT /api/events/{id}/status - 状态流转
///
/// 取消已付款的预约时对线上支付做尽力退款，退款失败不阻塞取消。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> AppResult<Json<AppResponse<Event>>> {
    let event = state
        .events()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    let event_ref = event
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Event record without id"))?;

    if req.status == EventStatus::Cancelled {
        refund_event_best_effort(&state, &event_ref).await;
    }

    let updated = state
        .events()
        .set_status(&event_ref, req.status)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    Ok(ok(updated))
}

/// POST /api/events/{id}/invoice - 确定费用并 (重) 建账单
pub async fn invoice(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<EventInvoice>,
) -> AppResult<Json<AppResponse<Billing>>> {
    if req.amount <= 0.0 {
        return Err(AppError::validation("Invoice amount must be positive"));
    }
    let discount = req.discount.unwrap_or(0.0);
    if !(0.0..=100.0).contains(&discount) {
        return Err(AppError::validation("Discount must be between 0 and 100"));
    }

    let event = state
        .events()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    let event_ref = event
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Event record without id"))?;

    state
        .events()
        .set_invoice(&event_ref, req.amount, discount)
        .await?;

    let net = crate::booking::apply_discount(req.amount, discount);
    let description = format!("Event Services ({:?}, {})", event.event_type, event.date);
    let mut fresh = Billing::open(None, Some(event_ref.clone()), vec![BillingItem::new(
        description,
        net,
    )]);
    if req.mark_as_paid {
        fresh.apply_payment(net, "Manual");
    }

    let bill = match state.billings().find_by_event(&event_ref).await? {
        Some(mut existing) => {
            state
                .billings()
                .replace_items(
                    &mut existing,
                    fresh.items,
                    fresh.total_amount,
                    fresh.paid_amount,
                    fresh.status,
                )
                .await?
        }
        None => state.billings().create(fresh).await?,
    };
    Ok(ok(bill))
}

/// DELETE /api/events/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state
        .events()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    Ok(ok_with_message((), "Event deleted"))
}

/// Refund the event's online payment, if one exists. Failures are logged
/// and swallowed so the cancellation itself always goes through.
async fn refund_event_best_effort(state: &ServerState, event_ref: &surrealdb::RecordId) {
    let bill = match state.billings().find_paid_by_event(event_ref).await {
        Ok(Some(bill)) => bill,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(target: "payments", event = %event_ref, error = %e, "bill lookup failed during event refund");
            return;
        }
    };

    let key = event_ref.key().to_string();
    let intent = match state.gateway.search_intents("event_id", &key).await {
        Ok(mut intents) if !intents.is_empty() => intents.remove(0),
        Ok(_) => return,
        Err(e) => {
            tracing::warn!(target: "payments", event = %event_ref, error = %e, "intent search failed during event refund");
            return;
        }
    };

    match state.gateway.refund(&intent.id).await {
        Ok(RefundOutcome::Refunded) | Ok(RefundOutcome::AlreadyRefunded) => {
            let mut bill = bill;
            bill.mark_refunded();
            if let Err(e) = state.billings().save(&bill).await {
                tracing::error!(target: "payments", event = %event_ref, error = %e, "failed to mark event bill refunded");
            }
            state
                .notifier
                .notify_staff(
                    NotificationKind::PaymentReversed,
                    "payment_reversed",
                    format!("Refund issued for cancelled event {key}"),
                    serde_json::json!({ "event_id": event_ref.to_string(), "intent_id": intent.id }),
                )
                .await;
        }
        Err(e) => {
            tracing::error!(target: "payments", event = %event_ref, error = %e, "event refund failed, manual follow-up required");
        }
    }
}
