//! User profile documents.

use chrono::{DateTime, Utc};
use medimart_core::types::{Email, UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Profile document stored per account, keyed by the account uid.
///
/// The uid is repeated inside the payload so back-office listings do not
/// need to join on document ids. The role field is authoritative only in
/// the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Minimal profile synthesized on first login or when the profile
    /// lookup fails.
    #[must_use]
    pub fn minimal(uid: UserId, email: &Email) -> Self {
        Self {
            uid,
            email: email.as_str().to_string(),
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            role: UserRole::User,
            created_at: Some(Utc::now()),
        }
    }
}
