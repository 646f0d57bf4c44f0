//! Text receipt API

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::ReceiptRequest;

pub fn router() -> Router<ServerState> {
    Router::new().route("/receipt/print", post(handler::print))
}
