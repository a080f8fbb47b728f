//! Chat API Handlers
//!
//! Messages persist in the `message` table and fan out over the receiver's
//! private channel. Private channels follow `private-user-{key}`; the staff
//! dashboard additionally subscribes to the shared staff channel.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Message, MessageSend};
use crate::db::repository::UserRepository;
use crate::notify::STAFF_CHANNEL;
use crate::utils::{AppError, AppResponse, AppResult, ok};

fn user_channel(user: &surrealdb::RecordId) -> String {
    format!("private-user-{}", user.key())
}

/// POST /api/chat/messages - 发送私信
pub async fn send(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<MessageSend>,
) -> AppResult<Json<AppResponse<Message>>> {
    if req.message.trim().is_empty() {
        return Err(AppError::validation("Message body is required"));
    }
    let sender = UserRepository::record(&user.id)?;
    let receiver = state
        .users()
        .find_by_id(&req.receiver)
        .await?
        .and_then(|u| u.id)
        .ok_or_else(|| AppError::not_found(format!("User {}", req.receiver)))?;

    let message = state
        .messages()
        .create(Message {
            id: None,
            sender: sender.clone(),
            receiver: receiver.clone(),
            message: req.message,
            read: false,
            created_at: Utc::now(),
        })
        .await?;

    // Best-effort push; the message is already persisted
    let payload = serde_json::json!({
        "sender": sender.to_string(),
        "message": message.message,
        "created_at": message.created_at,
    });
    if let Err(e) = state
        .publisher
        .publish(&user_channel(&receiver), "receive_message", &payload)
        .await
    {
        tracing::warn!(target: "notify", receiver = %receiver, error = %e, "chat push failed");
    }

    Ok(ok(message))
}

/// GET /api/chat/messages/{user_id} - 与某用户的历史记录
///
/// 拉取即视为已读：对方发来的未读消息全部标记。
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<AppResponse<Vec<Message>>>> {
    let me = UserRepository::record(&user.id)?;
    let other = UserRepository::record(&user_id)?;

    let messages = state.messages().history(&me, &other).await?;
    state.messages().mark_read(&other, &me).await?;
    Ok(ok(messages))
}

#[derive(Debug, Deserialize)]
pub struct ChannelAuthRequest {
    pub socket_id: String,
    pub channel_name: String,
}

#[derive(Debug, Serialize)]
pub struct ChannelAuthResponse {
    pub auth: String,
}

/// POST /api/chat/auth - 私有频道签名
///
/// 只能订阅自己的 `private-user-{key}`；员工凭 chat:staff 订阅员工频道。
pub async fn authorize_channel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ChannelAuthRequest>,
) -> AppResult<Json<ChannelAuthResponse>> {
    let me = UserRepository::record(&user.id)?;
    let allowed = req.channel_name == user_channel(&me)
        || (req.channel_name == STAFF_CHANNEL && user.has_permission("chat:staff"));
    if !allowed {
        return Err(AppError::forbidden("Not authorized for this channel"));
    }

    let auth = state
        .publisher
        .authorize_channel(&req.socket_id, &req.channel_name)?;
    Ok(Json(ChannelAuthResponse { auth }))
}
