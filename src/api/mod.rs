//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册/登录/找回密码
//! - [`rooms`] - 客房管理
//! - [`bookings`] - 预订流程
//! - [`billing`] - 账单
//! - [`events`] - 宴会预约
//! - [`tasks`] - 清洁/维修工单
//! - [`inquiries`] - 留言
//! - [`notifications`] - 通知面板
//! - [`reviews`] - 客房评价
//! - [`search`] - 全局搜索
//! - [`reports`] - 仪表盘报表
//! - [`chat`] - 站内聊天
//! - [`users`] - 用户管理

pub mod auth;
pub mod billing;
pub mod bookings;
pub mod chat;
pub mod events;
pub mod health;
pub mod inquiries;
pub mod notifications;
pub mod reports;
pub mod reviews;
pub mod rooms;
pub mod search;
pub mod tasks;
pub mod users;

use crate::core::ServerState;
use axum::Router;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble every resource router
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(rooms::router())
        .merge(bookings::router())
        .merge(billing::router())
        .merge(events::router())
        .merge(tasks::router())
        .merge(inquiries::router())
        .merge(notifications::router())
        .merge(reviews::router())
        .merge(search::router())
        .merge(reports::router())
        .merge(chat::router())
        .merge(users::router())
}
