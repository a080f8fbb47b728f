//! 聊天 API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 登录即可聊天；频道归属检查在 handler 内
    Router::new().nest(
        "/api/chat",
        Router::new()
            .route("/messages", post(handler::send))
            .route("/messages/{user_id}", get(handler::history))
            .route("/auth", post(handler::authorize_channel)),
    )
}
