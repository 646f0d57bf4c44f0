//! API 路由模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查、监听端口 | 无 |
//! | /printers | GET | 已安装打印机 | 令牌 |
//! | /logs/tail | GET | 日志尾部 (text/plain) | 令牌 |
//! | /print | POST | 原始 ESC/POS 数据 | 令牌 |
//! | /drawer/open | POST | 打开钱箱 | 令牌 |
//! | /receipt/print | POST | 文本小票 | 令牌 |

pub mod drawer;
pub mod health;
pub mod logs;
pub mod print;
pub mod printers;
pub mod receipt;

mod target;

pub use crate::core::{AppError, AppResult};

/// Default queue labels
pub const RAW_JOB_LABEL: &str = "Print Bridge Job";
pub const DRAWER_JOB_LABEL: &str = "Print Bridge Drawer";
pub const RECEIPT_JOB_LABEL: &str = "Print Bridge Receipt";
