//! 账单 API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/billing", billing_routes())
}

fn billing_routes() -> Router<ServerState> {
    // 账单全部为员工操作
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/booking/{booking_id}", get(handler::get_by_booking))
        .route("/{id}/items", post(handler::add_item))
        .route("/{id}/payments", post(handler::apply_payment))
        .route("/{id}/refund", post(handler::refund))
        .layer(middleware::from_fn(require_permission("billing:manage")))
}
