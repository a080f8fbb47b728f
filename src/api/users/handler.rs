//! User Management Handlers (admin only)

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::auth::{CurrentUser, hash_password};
use crate::core::ServerState;
use crate::db::models::{Role, User, UserCreate, UserPublic, UserUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/users
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<UserPublic>>>> {
    let users = state.users().find_all().await?;
    Ok(ok(users.into_iter().map(UserPublic::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<UserPublic>>> {
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(ok(user.into()))
}

/// POST /api/users - 建立员工账号
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> AppResult<Json<AppResponse<UserPublic>>> {
    if req.username.trim().is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if !req.email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if req.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let user = state
        .users()
        .create(User {
            id: None,
            username: req.username,
            email: req.email,
            password: hash_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?,
            role: req.role.unwrap_or(Role::HotelStaff),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        })
        .await?;
    Ok(ok(user.into()))
}

/// PUT /api/users/{id} - 改名、改邮箱、改角色
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<UserUpdate>,
) -> AppResult<Json<AppResponse<UserPublic>>> {
    let updated = state
        .users()
        .update(&id, req)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(ok(updated.into()))
}

/// DELETE /api/users/{id} - 不允许删除自己
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let target = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    if target.id.map(|r| r.to_string()).as_deref() == Some(user.id.as_str()) {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    state.users().delete(&id).await?;
    Ok(ok_with_message((), "User deleted"))
}
