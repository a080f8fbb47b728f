//! Room API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{BookedRange, Room, RoomCreate, RoomStatus, RoomUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/rooms - 获取所有客房
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Room>>>> {
    let rooms = state.rooms().find_all().await?;
    Ok(ok(rooms))
}

/// GET /api/rooms/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Room>>> {
    let room = state
        .rooms()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {id}")))?;
    Ok(ok(room))
}

/// GET /api/rooms/{id}/availability - 公共空房日历
pub async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<BookedRange>>>> {
    let ranges = state.bookings.unavailable_ranges(&id).await?;
    Ok(ok(ranges))
}

/// POST /api/rooms - 新建客房
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<RoomCreate>,
) -> AppResult<Json<AppResponse<Room>>> {
    if req.price_per_night <= 0.0 {
        return Err(AppError::validation("price_per_night must be positive"));
    }
    if req.room_number.trim().is_empty() {
        return Err(AppError::validation("room_number is required"));
    }

    let room = state
        .rooms()
        .create(Room {
            id: None,
            room_number: req.room_number,
            room_type: req.room_type,
            price_per_night: req.price_per_night,
            discount: req.discount.unwrap_or(0.0),
            status: RoomStatus::Available,
            description: req.description,
            amenities: req.amenities.unwrap_or_default(),
            images: req.images.unwrap_or_default(),
            created_at: chrono::Utc::now(),
        })
        .await?;
    Ok(ok(room))
}

/// PUT /api/rooms/{id} - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<RoomUpdate>,
) -> AppResult<Json<AppResponse<Room>>> {
    if let Some(price) = req.price_per_night
        && price <= 0.0
    {
        return Err(AppError::validation("price_per_night must be positive"));
    }

    let room = state
        .rooms()
        .update(&id, req)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {id}")))?;
    Ok(ok(room))
}

/// DELETE /api/rooms/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state
        .rooms()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {id}")))?;
    Ok(ok_with_message((), "Room deleted"))
}
