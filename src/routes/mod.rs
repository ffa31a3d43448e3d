// src/routes/mod.rs
pub mod generate;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;
use generate::generate_handler;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
}
