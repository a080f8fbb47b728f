//! 宴会预约 API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events", event_routes())
}

fn event_routes() -> Router<ServerState> {
    // 公共：提交预约 (联络表单，无需登录)
    // 登录用户：查看自己的预约、线上付款
    let open_routes = Router::new()
        .route("/", post(handler::create))
        .route("/my", get(handler::my_events))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", post(handler::create_payment_intent))
        .route("/{id}/confirm-payment", post(handler::confirm_payment));

    // 员工：列表、状态流转、开发票、删除
    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/invoice", post(handler::invoice))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("events:manage")));

    open_routes.merge(manage_routes)
}
