//! Outcome notice routes.

use axum::{extract::State, Json};
use medimart_core::Envelope;

use crate::{services::Notice, state::AppState};

/// Handle GET /api/notices requests.
///
/// Draining is destructive; each notice is delivered once.
pub async fn drain(State(state): State<AppState>) -> Json<Envelope<Vec<Notice>>> {
    Json(Envelope::ok(state.notifier().drain()))
}
