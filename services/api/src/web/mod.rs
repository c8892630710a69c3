pub mod protocol;
pub mod rest;
pub mod state;

pub use rest::{generate_handler, health_handler};
pub use state::{AppState, OutputMode};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Builds the application routes. Middleware layers (CORS, body limits, docs) are
/// added by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/api/generate", post(generate_handler))
        .with_state(app_state)
}
