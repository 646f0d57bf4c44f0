//! 核心模块 - 配置、状态、错误和服务器
//!
//! - [`Config`] - 启动配置
//! - [`ServerState`] - 处理器共享状态
//! - [`Server`] - HTTPS / HTTP 监听器
//! - [`AppError`] / [`StartupError`] - 错误定义

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult, StartupError};
pub use server::{Server, build_app};
pub use state::ServerState;
