//! Review API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate, ReviewUpdate};
use crate::db::repository::{RoomRepository, UserRepository};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

fn validate_rating(rating: u8) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }
    Ok(())
}

/// GET /api/reviews/room/{room_id} - 房间点评 (公共)
pub async fn list_by_room(
    State(state): State<ServerState>,
    Path(room_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Review>>>> {
    let room = RoomRepository::record(&room_id)?;
    let reviews = state.reviews().find_by_room(&room).await?;
    Ok(ok(reviews))
}

/// POST /api/reviews - 发表点评 (每人每房一条)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ReviewCreate>,
) -> AppResult<Json<AppResponse<Review>>> {
    validate_rating(req.rating)?;
    let room = state
        .rooms()
        .find_by_id(&req.room)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {}", req.room)))?;
    let room_ref = room
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Room record without id"))?;

    let review = state
        .reviews()
        .create(Review {
            id: None,
            room: room_ref,
            user: UserRepository::record(&user.id)?,
            rating: req.rating,
            comment: req.comment,
            created_at: Utc::now(),
        })
        .await?;
    Ok(ok(review))
}

/// PUT /api/reviews/{id} - 仅本人可改
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ReviewUpdate>,
) -> AppResult<Json<AppResponse<Review>>> {
    if let Some(rating) = req.rating {
        validate_rating(rating)?;
    }
    let review = state
        .reviews()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Review {id}")))?;
    if review.user.to_string() != user.id {
        return Err(AppError::forbidden("You may only edit your own review"));
    }

    let updated = state
        .reviews()
        .update(&id, req)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Review {id}")))?;
    Ok(ok(updated))
}

/// DELETE /api/reviews/{id} - 本人或管理员
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let review = state
        .reviews()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Review {id}")))?;
    if review.user.to_string() != user.id && !user.is_admin() {
        return Err(AppError::forbidden("You may only delete your own review"));
    }

    state.reviews().delete(&id).await?;
    Ok(ok_with_message((), "Review deleted"))
}
