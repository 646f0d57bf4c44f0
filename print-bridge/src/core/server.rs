//! Server Implementation
//!
//! Router assembly and the HTTPS / plaintext listeners

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, middleware};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::require_token;
use crate::core::{ServerState, StartupError};
use crate::middleware::logging_middleware;

/// Grace period for in-flight requests on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// CORS for a single configured origin; without one no CORS headers are sent
fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    match allowed_origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new(),
    }
}

/// Build the application router with state, auth and middleware applied
pub fn build_app(state: ServerState) -> Router {
    let cors = cors_layer(state.config.allowed_origin.as_deref());

    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::printers::router())
        .merge(crate::api::logs::router())
        .merge(crate::api::print::router())
        .merge(crate::api::drawer::router())
        .merge(crate::api::receipt::router())
        // CORS 在认证之内，未配置令牌时预检同样返回 401
        .layer(cors)
        // 令牌校验 - /health 与 OPTIONS 预检在 authorize 内部放行
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
}

/// HTTPS (+ optional HTTP) server
pub struct Server {
    state: ServerState,
    tls: Option<RustlsConfig>,
}

impl Server {
    pub fn new(state: ServerState, tls: Option<RustlsConfig>) -> Self {
        Self { state, tls }
    }

    /// Serve until Ctrl+C
    pub async fn run(self) -> Result<(), StartupError> {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };
        self.run_until(shutdown).await
    }

    /// Serve until `shutdown` resolves, then drain both listeners
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), StartupError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listeners = self.state.listeners.clone();
        let bind = listeners.bind_address;
        let app = build_app(self.state);

        let https_handle = Handle::new();
        let http_handle = Handle::new();

        {
            let https_handle = https_handle.clone();
            let http_handle = http_handle.clone();
            tokio::spawn(async move {
                shutdown.await;
                https_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                http_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });
        }

        let https = {
            let app = app.clone();
            let target = listeners.https_port.zip(self.tls);
            async move {
                let Some((port, tls)) = target else {
                    return Ok(());
                };
                let addr = SocketAddr::new(bind, port);
                tracing::info!("Starting HTTPS server on {}", addr);
                axum_server::bind_rustls(addr, tls)
                    .handle(https_handle)
                    .serve(app.into_make_service())
                    .await
                    .map_err(|e| StartupError::from_bind(port, e))
            }
        };

        let http = {
            let port = listeners.http_port;
            async move {
                let Some(port) = port else {
                    return Ok(());
                };
                let addr = SocketAddr::new(bind, port);
                tracing::info!("Starting HTTP server on {}", addr);
                axum_server::bind(addr)
                    .handle(http_handle)
                    .serve(app.into_make_service())
                    .await
                    .map_err(|e| StartupError::from_bind(port, e))
            }
        };

        for url in listeners.listening_urls() {
            tracing::info!(url = %url, "Listening");
        }

        tokio::try_join!(https, http)?;
        Ok(())
    }
}
