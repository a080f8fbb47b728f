//! 工单 API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tasks", task_routes())
}

fn task_routes() -> Router<ServerState> {
    // 执行人员：看自己的工单、更新状态
    let update_routes = Router::new()
        .route("/my", get(handler::my_tasks))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission("tasks:update")));

    // 前台 / 经理：建单、全量列表、删除
    let manage_routes = Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/completed", delete(handler::delete_completed))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("tasks:manage")));

    update_routes.merge(manage_routes)
}
