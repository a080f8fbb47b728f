//! 报表 API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/reports",
        Router::new()
            .route("/dashboard", get(handler::dashboard))
            .layer(middleware::from_fn(require_permission("reports:view"))),
    )
}
