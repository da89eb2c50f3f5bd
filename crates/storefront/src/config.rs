//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MEDIMART_PLATFORM_URL` - Base URL of the commerce platform API
//! - `MEDIMART_PLATFORM_PROJECT` - Platform project identifier
//! - `MEDIMART_PLATFORM_API_KEY` - Platform API key (high entropy, no placeholders)
//!
//! ## Optional
//! - `MEDIMART_HOST` - Bind address (default: 127.0.0.1)
//! - `MEDIMART_PORT` - Listen port (default: 3000)
//! - `MEDIMART_PLATFORM_API_VERSION` - Platform API version (default: v1)
//! - `MEDIMART_CART_FILE` - Path of the local cart snapshot (default: medimart-cart.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `MEDIMART_SENTRY_ENVIRONMENT` - Sentry environment name
//! - `MEDIMART_SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `MEDIMART_SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Keys below this Shannon entropy (bits per character) are refused as
/// almost certainly not issued by the platform console.
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a value as copied from documentation rather than
/// issued by the platform. Matched case-insensitively.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Commerce platform API configuration
    pub platform: PlatformConfig,
    /// Where the local cart snapshot is written
    pub cart_file: PathBuf,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Commerce platform API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PlatformConfig {
    /// Base URL of the platform API (e.g., <https://api.platform.example>)
    pub base_url: String,
    /// Project identifier, part of every document path
    pub project: String,
    /// Platform API version (e.g., v1)
    pub api_version: String,
    /// API key sent as `X-Api-Key` on every request
    pub api_key: SecretString,
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .field("api_version", &self.api_version)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when unset
    pub dsn: Option<String>,
    /// Environment name reported with events
    pub environment: Option<String>,
    /// Fraction of error events to send
    pub sample_rate: f32,
    /// Fraction of transactions to send
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env("MEDIMART_HOST", "127.0.0.1")?,
            port: parse_env("MEDIMART_PORT", "3000")?,
            cart_file: PathBuf::from(env_or("MEDIMART_CART_FILE", "medimart-cart.json")),
            platform: PlatformConfig::from_env()?,
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PlatformConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: require_env("MEDIMART_PLATFORM_URL")?,
            project: require_env("MEDIMART_PLATFORM_PROJECT")?,
            api_version: env_or("MEDIMART_PLATFORM_API_VERSION", "v1"),
            api_key: require_api_key("MEDIMART_PLATFORM_API_KEY")?,
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: std::env::var("SENTRY_DSN").ok(),
            environment: std::env::var("MEDIMART_SENTRY_ENVIRONMENT").ok(),
            sample_rate: parse_env("MEDIMART_SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: parse_env("MEDIMART_SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an env var with a default and parse it into its target type.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_or(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Load an API key and refuse obvious placeholders and low-entropy values.
fn require_api_key(key: &str) -> Result<SecretString, ConfigError> {
    let value = require_env(key)?;
    check_api_key(key, &value)?;
    Ok(SecretString::from(value))
}

fn check_api_key(key: &str, value: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();
    if let Some(marker) = PLACEHOLDER_MARKERS.iter().find(|m| lower.contains(*m)) {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!("appears to be a placeholder (contains '{marker}')"),
        ));
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= \
                 {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the platform console."
            ),
        ));
    }
    Ok(())
}

/// Shannon entropy of a string, in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }
    let counts = s.chars().fold(HashMap::new(), |mut acc, c| {
        *acc.entry(c).or_insert(0_usize) += 1;
        acc
    });
    #[allow(clippy::cast_precision_loss)] // key lengths are far below f64 precision
    let len = s.chars().count() as f64;
    counts
        .into_values()
        .map(|count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            platform: PlatformConfig {
                base_url: "https://api.platform.test".to_string(),
                project: "medimart-test".to_string(),
                api_version: "v1".to_string(),
                api_key: SecretString::from("k9#mQ2$vL8@xR4!wN7&pJ1*zF5^hB3"),
            },
            cart_file: PathBuf::from("medimart-cart.json"),
            sentry: SentryConfig::default(),
        }
    }

    #[test]
    fn test_shannon_entropy_degenerate_inputs() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        // One repeated symbol carries no information.
        assert!(shannon_entropy("aaaaaaa").abs() < f64::EPSILON);
        // Two symbols at 50/50 carry exactly one bit each.
        assert!((shannon_entropy("abab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_of_a_real_looking_key() {
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_api_key_rejects_placeholders() {
        for bad in ["your-api-key-here", "changeme123", "key-from-example-docs"] {
            let result = check_api_key("MEDIMART_PLATFORM_API_KEY", bad);
            assert!(
                matches!(result, Err(ConfigError::InsecureSecret(_, _))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_api_key_rejects_low_entropy() {
        let key = "a".repeat(40);
        let result = check_api_key("MEDIMART_PLATFORM_API_KEY", &key);
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_api_key_accepts_a_strong_key() {
        let key = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";
        assert!(check_api_key("MEDIMART_PLATFORM_API_KEY", key).is_ok());
    }

    #[test]
    fn test_api_key_missing_var() {
        assert!(matches!(
            require_api_key("MEDIMART_TEST_KEY_UNSET"),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_platform_config_debug_redacts_api_key() {
        let config = test_config();
        let debug_output = format!("{:?}", config.platform);

        // Public fields should be visible
        assert!(debug_output.contains("api.platform.test"));
        assert!(debug_output.contains("medimart-test"));

        // The key itself must never appear
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("k9#mQ2"));
    }
}
