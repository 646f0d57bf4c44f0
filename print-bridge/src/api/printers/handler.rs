use axum::{Json, extract::State};
use bridge_printer::PrinterDescriptor;

use crate::core::{AppResult, ServerState};

/// GET /printers - 已安装打印机 (每次重新查询)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<PrinterDescriptor>>> {
    let backend = state.backend.clone();
    let printers = tokio::task::spawn_blocking(move || backend.list_printers()).await??;
    Ok(Json(printers))
}
