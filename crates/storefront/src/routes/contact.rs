//! Contact form route.

use axum::{extract::State, Json};
use chrono::Utc;
use medimart_core::{validate, Envelope};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::{Feedback, FeedbackRecord},
    state::AppState,
};

const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 2000;

/// Payload for the contact form.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Handle POST /api/contact requests.
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<Envelope<Feedback>>> {
    let mut problems = Vec::new();
    if let Err(err) = validate::name(&payload.name) {
        problems.push(err.to_string());
    }
    if let Err(err) = validate::email(&payload.email) {
        problems.push(err.to_string());
    }
    let message = payload.message.trim();
    if !(MESSAGE_MIN..=MESSAGE_MAX).contains(&message.chars().count()) {
        problems.push(format!(
            "message must be between {MESSAGE_MIN} and {MESSAGE_MAX} characters"
        ));
    }
    if !problems.is_empty() {
        return Err(AppError::Validation(problems.join("; ")));
    }

    let record = FeedbackRecord {
        name: payload.name.trim().to_owned(),
        email: payload.email.trim().to_owned(),
        message: message.to_owned(),
        submitted_at: Utc::now(),
    };
    Ok(Json(state.gateway().submit_feedback(record).await))
}
