//! Booking API Handlers
//!
//! Thin wrappers over [`BookingManager`]; ownership checks live here.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::booking::Quote;
use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingStatus, QuoteRequest};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub quote: Quote,
    pub payment_intent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

/// POST /api/bookings/quote - 报价
pub async fn quote(
    State(state): State<ServerState>,
    Json(req): Json<QuoteRequest>,
) -> AppResult<Json<AppResponse<Quote>>> {
    let room = state.bookings.find_room(&req.room).await?;
    let quote = crate::booking::BookingManager::quote(
        &room,
        req.check_in_date,
        req.check_out_date,
        &req.extras,
    )?;
    Ok(ok(quote))
}

/// POST /api/bookings/intent - 创建支付意向
pub async fn create_intent(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<QuoteRequest>,
) -> AppResult<Json<AppResponse<IntentResponse>>> {
    let guest = UserRepository::record(&user.id)?;
    let (quote, intent) = state
        .bookings
        .create_stay_intent(
            &guest,
            &req.room,
            req.check_in_date,
            req.check_out_date,
            &req.extras,
        )
        .await?;
    Ok(ok(IntentResponse {
        quote,
        payment_intent_id: intent.id,
        client_secret: intent.client_secret,
    }))
}

/// POST /api/bookings - 预订 (需已完成支付)
pub async fn reserve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<BookingCreate>,
) -> AppResult<Json<AppResponse<Booking>>> {
    let guest = UserRepository::record(&user.id)?;
    let booking = state.bookings.reserve(guest, req).await?;
    Ok(ok(booking))
}

/// GET /api/bookings - 全部预订 (员工)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Booking>>>> {
    let bookings = state.bookings_repo().find_all().await?;
    Ok(ok(bookings))
}

/// GET /api/bookings/my - 当前用户的预订
pub async fn my_bookings(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Booking>>>> {
    let guest = UserRepository::record(&user.id)?;
    let bookings = state.bookings_repo().find_by_user(&guest).await?;
    Ok(ok(bookings))
}

/// GET /api/bookings/{id} - 本人或员工可见
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Booking>>> {
    let booking = state
        .bookings_repo()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;

    if user.is_guest() && booking.user.to_string() != user.id {
        return Err(AppError::forbidden("You may only view your own booking"));
    }
    Ok(ok(booking))
}

/// PUT /api/bookings/{id}/status - 状态流转
///
/// 访客只能取消自己的预订；员工需要 bookings:manage 权限。
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> AppResult<Json<AppResponse<Booking>>> {
    if !user.is_guest() && !user.has_permission("bookings:manage") {
        return Err(AppError::forbidden("Permission denied: bookings:manage"));
    }
    let booking = state
        .bookings
        .transition(&id, req.status, &user.id, user.is_guest())
        .await?;
    Ok(ok(booking))
}

/// DELETE /api/bookings/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state
        .bookings_repo()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;
    Ok(ok_with_message((), "Booking deleted"))
}
