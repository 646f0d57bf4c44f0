//! Raw ESC/POS print API

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::{PrintRequest, RAW_CONTENT_TYPE};

pub fn router() -> Router<ServerState> {
    Router::new().route("/print", post(handler::print_raw))
}
