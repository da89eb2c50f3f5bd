//! Sign-up, sign-in, and session inspection routes.

use axum::{extract::State, Json};
use medimart_core::Envelope;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    middleware::RequireAuth,
    models::UserProfile,
    services::SessionState,
    state::AppState,
};

/// Payload for creating an account.
///
/// No `Debug` derive; the payload carries a password.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for signing in.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The session as the client sees it.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

/// Handle POST /api/auth/register requests.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Envelope<UserProfile>>> {
    let profile = state
        .session()
        .register(&payload.name, &payload.email, &payload.password)
        .await?;
    Ok(Json(Envelope::ok(profile)))
}

/// Handle POST /api/auth/login requests.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Envelope<UserProfile>>> {
    let profile = state
        .session()
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(Envelope::ok(profile)))
}

/// Handle POST /api/auth/logout requests.
///
/// Clears the session and the persistent cart; the next shopper on this
/// device starts clean.
pub async fn logout(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Json<Envelope<()>> {
    state.session().logout();
    Json(Envelope::ok(()))
}

/// Handle GET /api/auth/session requests.
pub async fn session(State(state): State<AppState>) -> Json<Envelope<SessionView>> {
    let view = match state.session().current() {
        SessionState::Loading => SessionView {
            status: "loading",
            profile: None,
        },
        SessionState::Anonymous => SessionView {
            status: "anonymous",
            profile: None,
        },
        SessionState::Authenticated(user) => SessionView {
            status: "authenticated",
            profile: Some(user.profile),
        },
    };
    Json(Envelope::ok(view))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_view_omits_absent_profile() {
        let view = SessionView {
            status: "anonymous",
            profile: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json, serde_json::json!({"status": "anonymous"}));
    }
}
