use axum::{Router, routing::get};

use crate::adapters::http::app_state::AppState;

/// GET /health
async fn health() -> &'static str {
    "OK"
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
