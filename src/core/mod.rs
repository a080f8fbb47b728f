//! Core Module
//!
//! 配置、服务器状态和 HTTP 服务器：
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 全局共享状态 (数据库、外部服务适配器)
//! - [`Server`] - HTTP 服务器

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app};
pub use state::ServerState;
