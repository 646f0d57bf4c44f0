//! Print Bridge - 本地 HTTPS 打印网关
//!
//! # 架构概述
//!
//! 浏览器或收银端通过 HTTPS 提交打印、钱箱和小票请求，网关将其编码为
//! ESC/POS 字节流并以 RAW 作业交给系统打印队列。
//!
//! - **认证** (`auth`): 共享令牌，常量时间比较
//! - **启动** (`bootstrap`): 端口探测、证书发现与加载
//! - **HTTP API** (`api`): 路由和处理器
//! - **日志尾部** (`log_tail`): 读取运行日志的最后 N 行
//!
//! 编码与打印队列传输位于 `bridge-printer` crate。
//!
//! # 模块结构
//!
//! ```text
//! print-bridge/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # 令牌校验
//! ├── bootstrap/     # 端口与 TLS
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── utils/         # 环境与日志初始化
//! └── log_tail.rs    # 日志尾部
//! ```

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod core;
pub mod log_tail;
pub mod middleware;
pub mod utils;

// Re-export 公共类型
pub use self::core::{AppError, AppResult, Config, Server, ServerState, StartupError, build_app};
pub use utils::{init_logger, setup_environment};

pub fn print_banner() {
    println!(
        r#"
    ____       _       __     ____       _     __
   / __ \_____(_)___  / /_   / __ )_____(_)___/ /___ ____
  / /_/ / ___/ / __ \/ __/  / __  / ___/ / __  / __ `/ _ \
 / ____/ /  / / / / / /_   / /_/ / /  / / /_/ / /_/ /  __/
/_/   /_/  /_/_/ /_/\__/  /_____/_/  /_/\__,_/\__, /\___/
                                             /____/
    "#
    );
}
