use axum::{Router, routing::get};

use super::error::translate_errors;
use super::middleware::{require_api_key, track_performance};
use super::routes::todos::{self, AppState};

/// Compose the full application router. Middleware order is explicit:
/// error translation wraps performance tracking, which wraps the API-key
/// check, which wraps the routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(health))
        .route("/health/live", get(health))
        .merge(todos::router(state.clone()))
        .layer(axum::middleware::from_fn_with_state(state, require_api_key))
        .layer(axum::middleware::from_fn(track_performance))
        .layer(axum::middleware::from_fn(translate_errors))
}

async fn health() -> &'static str {
    "ok"
}
