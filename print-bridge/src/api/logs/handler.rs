use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::core::{AppError, AppResult, ServerState};
use crate::log_tail::{self, clamp_lines};

/// GET /logs/tail?lines=N - 最近 N 行日志，纯文本
///
/// Any `lines` value that is missing, unparsable or not positive means the
/// default count.
pub async fn tail(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let max_lines = clamp_lines(params.get("lines").map(String::as_str));
    let path = state.config.log_file_path();

    let lines = tokio::task::spawn_blocking(move || log_tail::tail(&path, max_lines))
        .await?
        .map_err(|e| AppError::internal(format!("Failed to read log file: {e}")))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        lines.join("\n"),
    ))
}
