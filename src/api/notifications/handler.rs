//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{MarkRead, Notification};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/notifications - 最近 50 条
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Notification>>>> {
    let notifications = state.notifications().find_recent().await?;
    Ok(ok(notifications))
}

/// PUT /api/notifications/read - 标记已读 (不带 id 则全部)
pub async fn mark_read(
    State(state): State<ServerState>,
    Json(req): Json<MarkRead>,
) -> AppResult<Json<AppResponse<()>>> {
    match req.id {
        Some(id) => {
            state
                .notifications()
                .mark_read(&id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Notification {id}")))?;
        }
        None => state.notifications().mark_all_read().await?,
    }
    Ok(ok_with_message((), "Marked as read"))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state
        .notifications()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {id}")))?;
    Ok(ok_with_message((), "Notification deleted"))
}

/// DELETE /api/notifications - 清空
pub async fn clear(State(state): State<ServerState>) -> AppResult<Json<AppResponse<()>>> {
    state.notifications().delete_all().await?;
    Ok(ok_with_message((), "Notifications cleared"))
}
