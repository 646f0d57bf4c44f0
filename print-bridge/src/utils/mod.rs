//! 工具模块 - 环境与日志

pub mod logger;

use std::path::PathBuf;

pub use logger::init_logger;

/// Load `.env` from the working directory or its parents, if any.
///
/// Returns the file that was loaded.
pub fn setup_environment() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}
