//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`AppResult`] - application error handling
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;
