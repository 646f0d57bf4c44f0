use axum::{Json, extract::State, extract::rejection::JsonRejection};
use bridge_printer::{DrawerCommand, PrintJob, escpos};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::DRAWER_JOB_LABEL;
use crate::api::target::{deliver, resolve_target};
use crate::core::{AppResult, ServerState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerRequest {
    pub printer_name: Option<String>,
    pub pin: Option<i64>,
    /// Pulse on time (ms)
    pub t1: Option<i64>,
    /// Pulse off time (ms)
    pub t2: Option<i64>,
}

/// POST /drawer/open - 钱箱脉冲
///
/// Sends only the 5-byte kick sequence; no initialize, feed or cut.
pub async fn open(
    State(state): State<ServerState>,
    payload: Result<Json<DrawerRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => DrawerRequest::default(),
        Err(e) => return Err(e.into()),
    };

    let command = DrawerCommand::new(
        req.pin.unwrap_or(state.config.default_drawer_pin),
        req.t1.unwrap_or(escpos::DEFAULT_DRAWER_ON_MS),
        req.t2.unwrap_or(escpos::DEFAULT_DRAWER_OFF_MS),
    )?;

    let printer = resolve_target(&state, req.printer_name).await?;
    deliver(
        &state,
        PrintJob::new(printer, DRAWER_JOB_LABEL, command.to_bytes().to_vec()),
    )
    .await?;

    Ok(Json(json!({ "opened": true })))
}
