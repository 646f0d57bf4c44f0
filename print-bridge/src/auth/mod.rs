//! 认证模块
//!
//! 共享令牌校验：
//! - [`authorize`] - 纯函数判定
//! - [`require_token`] - Axum 中间件

pub mod gate;
pub mod middleware;

pub use gate::{TOKEN_HEADER, TOKEN_QUERY_PARAM, authorize};
pub use middleware::require_token;
