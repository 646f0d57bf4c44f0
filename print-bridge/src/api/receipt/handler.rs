use axum::{Json, extract::State, extract::rejection::JsonRejection};
use bridge_printer::{Alignment, DrawerCommand, PrintJob, ReceiptOptions, build_receipt_with};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::RECEIPT_JOB_LABEL;
use crate::api::target::{deliver, resolve_target};
use crate::core::{AppError, AppResult, ServerState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub printer_name: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub open_drawer: bool,
    pub pin: Option<i64>,
    /// Optional centred bold line above the body
    pub header: Option<String>,
    /// `left` (default), `center` or `right`
    pub align: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub double_size: bool,
}

fn parse_alignment(value: Option<&str>) -> AppResult<Alignment> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("left") => Ok(Alignment::Left),
        Some("center") | Some("centre") => Ok(Alignment::Center),
        Some("right") => Ok(Alignment::Right),
        Some(other) => Err(AppError::invalid(format!("Unknown alignment '{other}'"))),
    }
}

impl ReceiptRequest {
    /// Validated body text and composition options
    fn options(&self, default_pin: i64) -> AppResult<(&str, ReceiptOptions)> {
        let text = self
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::invalid("text must not be empty"))?;

        let mut options = ReceiptOptions {
            alignment: parse_alignment(self.align.as_deref())?,
            bold: self.bold,
            double_size: self.double_size,
            ..ReceiptOptions::default()
        };

        if let Some(header) = self.header.as_deref().filter(|h| !h.trim().is_empty()) {
            options = options.with_header(header);
        }

        // pin is validated even when the drawer stays closed
        let drawer = DrawerCommand::with_pin(self.pin.unwrap_or(default_pin))?;
        if self.open_drawer {
            options = options.with_drawer(drawer);
        }

        Ok((text, options))
    }
}

/// POST /receipt/print - 组装并打印文本小票
pub async fn print(
    State(state): State<ServerState>,
    payload: Result<Json<ReceiptRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(req) = payload?;
    let (text, options) = req.options(state.config.default_drawer_pin)?;
    let data = build_receipt_with(text, &options);

    let printer = resolve_target(&state, req.printer_name.clone()).await?;
    deliver(&state, PrintJob::new(printer, RECEIPT_JOB_LABEL, data)).await?;

    Ok(Json(json!({ "printed": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_printer::build_receipt;

    fn request(text: &str) -> ReceiptRequest {
        serde_json::from_value(json!({ "text": text })).unwrap()
    }

    #[test]
    fn test_plain_request_matches_plain_receipt() {
        let req = request("Ticket de test");
        let (text, options) = req.options(0).unwrap();
        assert_eq!(build_receipt_with(text, &options), build_receipt("Ticket de test"));
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(matches!(request("  \n").options(0), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_bad_pin_rejected_even_without_drawer() {
        let mut req = request("hello");
        req.pin = Some(2);
        assert!(matches!(req.options(0), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_alignment_parsing() {
        assert_eq!(parse_alignment(None).unwrap(), Alignment::Left);
        assert_eq!(parse_alignment(Some("Center")).unwrap(), Alignment::Center);
        assert_eq!(parse_alignment(Some("right")).unwrap(), Alignment::Right);
        assert!(parse_alignment(Some("justify")).is_err());
    }
}
