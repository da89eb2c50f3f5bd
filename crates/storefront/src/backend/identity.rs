//! Client for the platform identity service.
//!
//! Credentials never touch our own storage. Sign-up, sign-in, and password
//! changes are delegated to the platform's account endpoints, which answer
//! with an opaque session token and the account's uid.

use std::sync::Arc;
use std::time::Duration;

use medimart_core::types::{Email, EmailError, UserId};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::instrument;

use crate::config::PlatformConfig;

const API_KEY_HEADER: &str = "X-Api-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum accepted password length, checked before any network call.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Account and session errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email failed validation
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong email/password combination
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration attempted with an email that already has an account
    #[error("An account with this email already exists")]
    EmailInUse,

    /// Password rejected by local or platform policy
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Display name failed validation
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Operation requires an authenticated session
    #[error("Not signed in")]
    NotAuthenticated,

    /// Network or transport failure
    #[error("Identity service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse the response body
    #[error("Failed to parse identity response: {0}")]
    Parse(String),

    /// Identity service returned an unrecognized error
    #[error("Identity service error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// An authenticated platform account.
///
/// Implements `Debug` manually to redact the session token.
#[derive(Clone)]
pub struct Principal {
    pub uid: UserId,
    pub email: Email,
    pub id_token: SecretString,
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Principal")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdentityErrorBody {
    error: IdentityErrorDetail,
}

#[derive(Debug, Deserialize)]
struct IdentityErrorDetail {
    message: String,
}

/// Client for the platform account endpoints.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: reqwest::Client,
    /// `{base_url}/{version}/projects/{project}/accounts`
    root: String,
    api_key: SecretString,
}

impl IdentityClient {
    /// Create a new client from platform configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the HTTP client cannot be built.
    pub fn new(config: &PlatformConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let root = format!(
            "{}/{}/projects/{}/accounts",
            config.base_url.trim_end_matches('/'),
            config.api_version,
            config.project
        );
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                root,
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Register a new account.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, email: &Email, password: &str) -> Result<Principal, AuthError> {
        let body = json!({
            "email": email.as_str(),
            "password": password,
        });
        let response = self.execute("signUp", &body).await?;
        principal_from_response(response)
    }

    /// Sign in with email and password.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<Principal, AuthError> {
        let body = json!({
            "email": email.as_str(),
            "password": password,
        });
        let response = self.execute("signInWithPassword", &body).await?;
        principal_from_response(response)
    }

    /// Change the password of the account behind `id_token`.
    #[instrument(skip_all)]
    pub async fn update_password(
        &self,
        id_token: &SecretString,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let body = json!({
            "idToken": id_token.expose_secret(),
            "password": new_password,
        });
        self.execute("update", &body).await?;
        Ok(())
    }

    async fn execute(
        &self,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<AccountResponse, AuthError> {
        let url = format!("{}:{action}", self.inner.root);
        let response = self
            .inner
            .client
            .post(url)
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(map_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, action, "failed to parse identity response");
            AuthError::Parse(e.to_string())
        })
    }
}

fn principal_from_response(response: AccountResponse) -> Result<Principal, AuthError> {
    let token = response
        .id_token
        .ok_or_else(|| AuthError::Parse("response missing idToken".to_string()))?;
    let email = Email::parse(&response.email)?;
    Ok(Principal {
        uid: UserId::new(response.local_id),
        email,
        id_token: SecretString::from(token),
    })
}

/// Map an identity error response to a typed `AuthError`.
///
/// The service encodes the failure as an upper-snake token in the error
/// message, sometimes followed by explanatory text.
fn map_error(status: StatusCode, body: &str) -> AuthError {
    let message = serde_json::from_str::<IdentityErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(500).collect());

    let token = message
        .split([':', ' '])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    match token.as_str() {
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" => {
            AuthError::InvalidCredentials
        }
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" => AuthError::NotAuthenticated,
        _ => {
            tracing::warn!(status = %status, message = %message, "identity request failed");
            AuthError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Check a password against the local length policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` for passwords under
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn error_body(message: &str) -> String {
        format!(r#"{{"error": {{"code": 400, "message": "{message}"}}}}"#)
    }

    #[test]
    fn test_map_error_email_exists() {
        let err = map_error(StatusCode::BAD_REQUEST, &error_body("EMAIL_EXISTS"));
        assert!(matches!(err, AuthError::EmailInUse));
    }

    #[test]
    fn test_map_error_invalid_credentials() {
        for token in [
            "INVALID_LOGIN_CREDENTIALS",
            "INVALID_PASSWORD",
            "EMAIL_NOT_FOUND",
        ] {
            let err = map_error(StatusCode::BAD_REQUEST, &error_body(token));
            assert!(matches!(err, AuthError::InvalidCredentials), "{token}");
        }
    }

    #[test]
    fn test_map_error_weak_password_with_suffix() {
        let err = map_error(
            StatusCode::BAD_REQUEST,
            &error_body("WEAK_PASSWORD : Password should be at least 8 characters"),
        );
        assert!(matches!(err, AuthError::WeakPassword));
    }

    #[test]
    fn test_map_error_expired_token() {
        let err = map_error(StatusCode::UNAUTHORIZED, &error_body("TOKEN_EXPIRED"));
        assert!(matches!(err, AuthError::NotAuthenticated));
    }

    #[test]
    fn test_map_error_unknown_token() {
        let err = map_error(StatusCode::BAD_REQUEST, &error_body("QUOTA_EXCEEDED"));
        match err {
            AuthError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "QUOTA_EXCEEDED");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_error_unparseable_body() {
        let err = map_error(StatusCode::BAD_GATEWAY, "upstream timeout");
        assert!(matches!(err, AuthError::Api { status: 502, .. }));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short1"),
            Err(AuthError::WeakPassword)
        ));
    }

    #[test]
    fn test_validate_password_exact_minimum() {
        assert!(validate_password("exactly8").is_ok());
    }

    #[test]
    fn test_principal_debug_redacts_token() {
        let principal = Principal {
            uid: UserId::new("u1"),
            email: Email::parse("buyer@example.com").unwrap(),
            id_token: SecretString::from("tok-very-secret"),
        };
        let debug = format!("{principal:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok-very-secret"));
    }

    #[test]
    fn test_account_response_parses() {
        let response: AccountResponse = serde_json::from_str(
            r#"{"localId": "u42", "email": "a@b.co", "idToken": "tok-u42"}"#,
        )
        .unwrap();
        assert_eq!(response.local_id, "u42");
        assert_eq!(response.id_token.as_deref(), Some("tok-u42"));
    }
}
