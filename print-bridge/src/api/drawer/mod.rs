//! Cash drawer API

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::DrawerRequest;

pub fn router() -> Router<ServerState> {
    Router::new().route("/drawer/open", post(handler::open))
}
