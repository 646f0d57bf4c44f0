use axum::{Json, extract::State, extract::rejection::JsonRejection};
use base64::Engine;
use bridge_printer::PrintJob;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::RAW_JOB_LABEL;
use crate::api::target::{deliver, resolve_target};
use crate::core::{AppError, AppResult, ServerState};

/// The only payload format accepted by `/print`
pub const RAW_CONTENT_TYPE: &str = "raw-escpos";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub printer_name: Option<String>,
    pub job_name: Option<String>,
    pub data_base64: Option<String>,
    pub content_type: Option<String>,
}

impl PrintRequest {
    /// Decoded payload, or why the request is unusable
    fn payload(&self) -> AppResult<Vec<u8>> {
        match self.content_type.as_deref().map(str::trim) {
            Some(RAW_CONTENT_TYPE) => {}
            Some(other) => {
                return Err(AppError::invalid(format!(
                    "Unsupported contentType '{other}', expected '{RAW_CONTENT_TYPE}'"
                )));
            }
            None => return Err(AppError::invalid("contentType is required")),
        }

        let encoded = self
            .data_base64
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::invalid("dataBase64 is required"))?;

        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| AppError::invalid(format!("dataBase64 is not valid base64: {e}")))?;

        if data.is_empty() {
            return Err(AppError::invalid("dataBase64 decodes to no bytes"));
        }
        Ok(data)
    }

    fn label(&self) -> &str {
        self.job_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(RAW_JOB_LABEL)
    }
}

/// POST /print - 原样发送客户端编码好的 ESC/POS 数据
pub async fn print_raw(
    State(state): State<ServerState>,
    payload: Result<Json<PrintRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(req) = payload?;
    let data = req.payload()?;

    let printer = resolve_target(&state, req.printer_name.clone()).await?;
    deliver(&state, PrintJob::new(printer, req.label(), data)).await?;

    Ok(Json(json!({ "sent": true })))
}
