//! 留言 API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inquiries", inquiry_routes())
}

fn inquiry_routes() -> Router<ServerState> {
    // 公共：联系表单提交
    let public_routes = Router::new().route("/", post(handler::create));

    // 员工：列表、回复、删除
    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/reply", post(handler::reply))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("inquiries:manage")));

    public_routes.merge(manage_routes)
}
