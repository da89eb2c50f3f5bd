//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use medimart_core::Envelope;

use crate::state::AppState;

/// Handle GET /health requests.
pub async fn health() -> impl IntoResponse {
    Json(Envelope::ok("ok"))
}

/// Handle GET /health/ready requests.
///
/// Reports 503 until the session provider has settled out of its
/// loading state, so load balancers hold traffic during startup.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.session().current().is_ready() {
        (StatusCode::OK, Json(Envelope::ok("ready")))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Envelope::failure("Session is still loading, try again")),
        )
    }
}
