//! LuxuryStay HMS - 酒店管理系统后端
//!
//! # 架构概述
//!
//! 单体 REST 后端，嵌入式 SurrealDB 存储，外部服务 (Stripe、Pusher、SMTP)
//! 以 trait 对象注入：
//!
//! - **HTTP API** (`api`): 资源路由和处理器
//! - **认证** (`auth`): JWT + Argon2 + 基于角色的权限表
//! - **预订流程** (`booking`): 报价、支付核验、重叠检测、退款
//! - **数据库** (`db`): 嵌入式 SurrealDB 模型与仓储
//! - **推送/邮件** (`notify`): Pusher 实时事件 + SMTP 邮件
//! - **支付** (`payments`): Stripe 支付意向与退款
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── auth/          # JWT 认证、权限、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── booking/       # 预订生命周期
//! ├── payments/      # 支付网关
//! ├── notify/        # 实时推送和邮件
//! ├── db/            # 模型和仓储
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod core;
pub mod db;
pub mod notify;
pub mod payments;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use booking::BookingManager;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: dotenv、工作目录、日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/luxurystay".into());
    let log_dir = format!("{work_dir}/logs");
    std::fs::create_dir_all(&log_dir)?;
    std::fs::create_dir_all(format!("{work_dir}/data"))?;

    let level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(level.as_deref(), Some(&log_dir));
    Ok(())
}
