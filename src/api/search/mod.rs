//! 全局搜索 API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/search",
        Router::new()
            .route("/", get(handler::search))
            .layer(middleware::from_fn(require_permission("search:use"))),
    )
}
