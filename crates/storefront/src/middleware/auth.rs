//! Session gates for identity- and role-protected routes.
//!
//! Handlers declare what they need by taking one of these extractors;
//! rejection replies use the same failure envelope as every other error.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medimart_core::types::Envelope;

use crate::services::{SessionState, SessionUser};
use crate::state::AppState;

/// Extracts the signed-in shopper, or rejects.
pub struct RequireAuth(pub SessionUser);

/// Extracts the signed-in admin, or rejects.
pub struct RequireAdmin(pub SessionUser);

/// Extracts the shopper when signed in; never rejects.
pub struct OptionalAuth(pub Option<SessionUser>);

/// Why a gated request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    NotSignedIn,
    NotAdmin,
    /// Session provider still initializing.
    NotReady,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotSignedIn => (StatusCode::UNAUTHORIZED, "Sign in to continue"),
            Self::NotAdmin => (StatusCode::FORBIDDEN, "Admin access required"),
            Self::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Session is still loading, try again",
            ),
        };
        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.session().current() {
            SessionState::Authenticated(user) => Ok(Self(user)),
            SessionState::Anonymous => Err(AuthRejection::NotSignedIn),
            SessionState::Loading => Err(AuthRejection::NotReady),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.session().current() {
            SessionState::Authenticated(user) if user.role().is_admin() => Ok(Self(user)),
            SessionState::Authenticated(_) => Err(AuthRejection::NotAdmin),
            SessionState::Anonymous => Err(AuthRejection::NotSignedIn),
            SessionState::Loading => Err(AuthRejection::NotReady),
        }
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().authenticated_user()))
    }
}
