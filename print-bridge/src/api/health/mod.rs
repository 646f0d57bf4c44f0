//! 健康检查路由
//!
//! 唯一无需令牌的路由，返回版本、时间和实际监听端口。
//!
//! ```json
//! {
//!   "ok": true,
//!   "httpsEnabled": true,
//!   "version": "0.1.0",
//!   "time": "2024-05-01T10:00:00+02:00",
//!   "ports": { "https": 49001, "http": null },
//!   "listeningUrls": ["https://127.0.0.1:49001"]
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct Ports {
    pub https: Option<u16>,
    pub http: Option<u16>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub https_enabled: bool,
    pub version: &'static str,
    pub time: String,
    pub ports: Ports,
    pub listening_urls: Vec<String>,
}

/// GET /health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let listeners = &state.listeners;
    Json(HealthResponse {
        ok: true,
        https_enabled: listeners.https_enabled(),
        version: env!("CARGO_PKG_VERSION"),
        time: chrono::Local::now().to_rfc3339(),
        ports: Ports {
            https: listeners.https_port,
            http: listeners.http_port,
        },
        listening_urls: listeners.listening_urls(),
    })
}
