//! 点评 API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reviews", review_routes())
}

fn review_routes() -> Router<ServerState> {
    // GET /room/{room_id} 为公共路由；其余需登录，归属检查在 handler 内
    Router::new()
        .route("/room/{room_id}", get(handler::list_by_room))
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}", delete(handler::delete))
}
