use std::process::ExitCode;

use print_bridge::bootstrap;
use print_bridge::{Config, Server, ServerState, StartupError, init_logger, print_banner, setup_environment};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. 设置环境 (.env)
    let env_file = setup_environment();

    // 2. 加载并校验配置
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("print-bridge: {e}");
        return ExitCode::from(e.exit_code());
    }

    // 3. 日志 (控制台 + 文件)
    if let Err(e) = init_logger(&config.log_level, config.log_json, Some(&config.log_file_path())) {
        eprintln!("print-bridge: {e:#}");
        return ExitCode::FAILURE;
    }

    print_banner();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Print Bridge starting...");
    if let Some(path) = env_file {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }
    if config.token.is_none() {
        tracing::warn!("BRIDGE_TOKEN is not set, every request except /health will be rejected");
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("print-bridge: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    // 4. 打印后端
    let backend = bridge_printer::native_backend();

    // 5. 证书与端口
    let listeners = bootstrap::prepare(&config)?;

    // 6. 启动服务器
    let state = ServerState::new(config, listeners.state, backend);
    Server::new(state, listeners.tls).run().await
}
