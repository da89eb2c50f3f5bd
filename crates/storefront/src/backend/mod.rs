//! Clients for the managed commerce platform.
//!
//! The storefront owns no database. Catalog, orders, profiles, and the rest
//! live in the platform's document store, reached over REST via
//! [`DocumentClient`]. Account credentials are handled by the platform's
//! identity service via [`IdentityClient`]. [`DataGateway`] sits on top of
//! both and is the only surface the rest of the application talks to.

pub mod documents;
pub mod gateway;
pub mod identity;

pub use documents::{Document, DocumentClient};
pub use gateway::DataGateway;
pub use identity::{AuthError, IdentityClient, Principal};

use thiserror::Error;

/// Errors from the platform document API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network or transport failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Platform returned an error response
    #[error("Platform API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response body
    #[error("Failed to parse platform response: {0}")]
    Parse(String),

    /// Document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Rate limited by the platform
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = BackendError::Api {
            status: 500,
            message: "internal".to_string(),
        };
        assert_eq!(err.to_string(), "Platform API error (500): internal");
    }

    #[test]
    fn test_not_found_display() {
        let err = BackendError::NotFound("products/p1".to_string());
        assert_eq!(err.to_string(), "Document not found: products/p1");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = BackendError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(err.to_string(), "Rate limited, retry after 30s");
    }
}
