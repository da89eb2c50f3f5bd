//! Unified error handling with Sentry integration.
//!
//! Every handler error leaves the server as the same JSON envelope the
//! data gateway uses, `{ "success": false, "error": "..." }`, with a
//! meaningful status code. Server-side detail stays in the logs and in
//! Sentry; clients get a safe message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medimart_core::types::Envelope;
use thiserror::Error;

use crate::backend::AuthError;
use crate::services::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Account or session operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Checkout rejected the request before reaching the platform.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Request content failed validation.
    #[error("{0}")]
    Validation(String),

    /// Resource not found, or not the caller's to see.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// User is not authenticated.
    #[error("Sign in to continue")]
    Unauthorized,

    /// Authenticated, but not an admin.
    #[error("Admin access required")]
    Forbidden,

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// The managed platform could not serve the request.
    #[error("Platform unavailable: {0}")]
    Platform(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Platform(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Checkout(err) => match err {
                CheckoutError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::EmailInUse => StatusCode::CONFLICT,
                AuthError::WeakPassword
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidName(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AuthError::Http(_) | AuthError::Parse(_) | AuthError::Api { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }

    /// What the client is told. Internal detail never crosses here.
    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Platform(_) => "Service temporarily unavailable".to_string(),
            Self::Auth(AuthError::Http(_) | AuthError::Parse(_) | AuthError::Api { .. }) => {
                "Could not reach the sign-in service".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(Envelope::<()>::failure(self.client_message()))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(id: &str, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(id.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad phone".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(get_status(AppError::NotFound("order")), StatusCode::NOT_FOUND);
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::BadRequest("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(
            get_status(AppError::from(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::from(AuthError::EmailInUse)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::from(AuthError::WeakPassword)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_checkout_status_codes() {
        assert_eq!(
            get_status(AppError::from(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::from(CheckoutError::Validation(
                "phone number must be exactly 10 digits".to_string()
            ))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_not_found_names_the_resource() {
        assert_eq!(AppError::NotFound("order").client_message(), "order not found");
    }

    #[test]
    fn test_internal_detail_is_redacted() {
        let err = AppError::Internal("connection pool exhausted at 10.0.3.7".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_platform_detail_is_redacted() {
        let err = AppError::Platform("HTTP 503 from api.platform.internal".to_string());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.client_message(), "Service temporarily unavailable");
    }

    #[test]
    fn test_auth_transport_detail_is_redacted() {
        let err = AppError::from(AuthError::Api {
            status: 500,
            message: "stack trace with internals".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(!err.client_message().contains("stack trace"));
    }
}
