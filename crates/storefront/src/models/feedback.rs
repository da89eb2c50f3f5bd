//! Contact-form feedback documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::Document;

/// Feedback document payload, written from the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

/// A feedback entry with its document id, for admin review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl Feedback {
    #[must_use]
    pub fn from_document(doc: Document<FeedbackRecord>) -> Self {
        Self {
            id: doc.id,
            name: doc.data.name,
            email: doc.data.email,
            message: doc.data.message,
            submitted_at: doc.data.submitted_at,
        }
    }
}
