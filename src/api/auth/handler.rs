//! Authentication Handlers
//!
//! Registration, login, profile and the password-reset flow.

use std::time::Duration;

use axum::{Json, extract::State};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::{CurrentUser, hash_password, permissions_for, verify_password};
use crate::core::ServerState;
use crate::db::models::{Role, User, UserCreate, UserPublic};
use crate::notify::email::password_reset_body;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Reset tokens are valid for 10 minutes
const RESET_TOKEN_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPublic,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

fn issue_token(state: &ServerState, user: &User) -> AppResult<String> {
    let user_id = user
        .id
        .as_ref()
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::internal("User record without id"))?;
    let permissions = permissions_for(user.role);
    state
        .jwt_service
        .generate_token(&user_id, &user.username, user.role, &permissions)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))
}

/// POST /api/auth/register - 公共注册，角色固定为 guest
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    if req.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }
    if !req.email.contains('@') {
        return Err(AppError::validation("Invalid email address"));
    }

    let password = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    // Self-registration never grants a staff role
    let user = state
        .users()
        .create(User {
            id: None,
            username: req.username,
            email: req.email,
            password,
            role: Role::Guest,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: chrono::Utc::now(),
        })
        .await?;

    let token = issue_token(&state, &user)?;
    Ok(ok(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let user = state.users().find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent account enumeration
    let user = match user {
        Some(u) if verify_password(&req.password, &u.password) => u,
        _ => {
            tracing::warn!(target: "security", email = %req.email, "Login failed");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = issue_token(&state, &user)?;
    Ok(ok(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<UserPublic>>> {
    let profile = state
        .users()
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(ok(profile.into()))
}

/// POST /api/auth/forgot-password
///
/// Always answers success so the endpoint cannot be used to probe for
/// registered addresses. Only the SHA-256 hash of the token is stored.
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<AppResponse<()>>> {
    let users = state.users();
    if let Some(user) = users.find_by_email(&req.email).await? {
        let user_id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record without id"))?;

        let mut raw = [0u8; 32];
        SystemRandom::new()
            .fill(&mut raw)
            .map_err(|_| AppError::internal("Random token generation failed"))?;
        let token = hex::encode(raw);
        let token_hash = hex::encode(Sha256::digest(token.as_bytes()));
        let expire = chrono::Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        users.set_reset_token(&user_id, token_hash, expire).await?;

        let reset_link = format!("{}/reset-password?token={token}", state.config.client_url);
        if let Err(e) = state
            .mailer
            .send(
                &user.email,
                "Reset your password",
                password_reset_body(&reset_link),
            )
            .await
        {
            tracing::error!(target: "email", error = %e, "password reset mail failed");
            // Token would be unreachable without the mail
            users.clear_reset_token(&user_id).await?;
            return Err(AppError::upstream("Failed to send reset email"));
        }
    }

    Ok(ok_with_message(
        (),
        "If the address is registered, a reset email has been sent",
    ))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<AppResponse<()>>> {
    if req.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let token_hash = hex::encode(Sha256::digest(req.token.as_bytes()));
    let users = state.users();
    let user = users
        .find_by_reset_token(&token_hash)
        .await?
        .ok_or_else(|| AppError::validation("Invalid or expired reset token"))?;

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record without id"))?;
    let password = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    users.set_password(&user_id, password).await?;
    users.clear_reset_token(&user_id).await?;

    Ok(ok_with_message((), "Password updated"))
}
