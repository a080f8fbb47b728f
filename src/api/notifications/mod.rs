//! 通知 API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", notification_routes())
}

fn notification_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).delete(handler::clear))
        .route("/read", put(handler::mark_read))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("notifications:view")))
}
