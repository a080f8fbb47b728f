//! 预订 API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", booking_routes())
}

fn booking_routes() -> Router<ServerState> {
    // 登录用户：报价、支付、预订、查看自己的预订
    let guest_routes = Router::new()
        .route("/quote", post(handler::quote))
        .route("/intent", post(handler::create_intent))
        .route("/", post(handler::reserve))
        .route("/my", get(handler::my_bookings))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status));

    // 员工：全部预订、删除
    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("bookings:manage")));

    guest_routes.merge(staff_routes)
}
