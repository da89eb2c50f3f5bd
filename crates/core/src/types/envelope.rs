//! Uniform result envelope for remote operations.

use serde::{Deserialize, Serialize};

/// The result shape every remote operation resolves to.
///
/// Gateway calls never surface transport errors to callers; they resolve
/// to an `Envelope` with `success` set and either `data` or a
/// human-readable `error` message. HTTP handlers reuse the same shape so
/// the client sees one contract everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// A successful result carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed result carrying a human-readable message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// The payload, if the operation succeeded.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Map the payload type, keeping success flag and error intact.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_shape() {
        let env = Envelope::ok(vec![1, 2]);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_failure_shape() {
        let env: Envelope<()> = Envelope::failure("platform unreachable");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "platform unreachable"})
        );
    }

    #[test]
    fn test_failure_has_no_data() {
        let env: Envelope<String> = Envelope::failure("nope");
        assert!(!env.success);
        assert!(env.into_data().is_none());
    }

    #[test]
    fn test_map_keeps_error() {
        let env: Envelope<u32> = Envelope::failure("nope");
        let mapped = env.map(|n| n.to_string());
        assert!(!mapped.success);
        assert_eq!(mapped.error.as_deref(), Some("nope"));
    }
}
