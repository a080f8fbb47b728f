//! 客房 API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/rooms", room_routes())
}

fn room_routes() -> Router<ServerState> {
    // 公共浏览：房间列表、详情、空房日历
    let public_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/availability", get(handler::availability));

    // 状态修改：前台也可操作
    let update_routes = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission("rooms:update")));

    // 增删：仅经理及以上
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_permission("rooms:manage")));

    public_routes.merge(update_routes).merge(manage_routes)
}
