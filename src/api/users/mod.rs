//! 用户管理 API 模块 (仅管理员)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/users",
        Router::new()
            .route("/", get(handler::list).post(handler::create))
            .route("/{id}", get(handler::get_by_id))
            .route("/{id}", put(handler::update))
            .route("/{id}", delete(handler::delete))
            .layer(middleware::from_fn(require_admin)),
    )
}
