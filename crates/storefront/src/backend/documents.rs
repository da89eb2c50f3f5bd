//! Typed REST client for the platform document store.
//!
//! Every collection lives under
//! `{base_url}/{version}/projects/{project}/collections/{collection}`.
//! Documents are JSON envelopes carrying an `id`, the payload under `data`,
//! and server-assigned `createTime`/`updateTime` stamps.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::BackendError;
use crate::config::PlatformConfig;

const API_KEY_HEADER: &str = "X-Api-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// A stored document as returned by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<T> {
    /// Server-assigned document identifier
    pub id: String,
    /// The document payload
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResponse<T> {
    #[serde(default)]
    documents: Vec<Document<T>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the platform document REST API.
///
/// Cheap to clone; all clones share one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: reqwest::Client,
    /// `{base_url}/{version}/projects/{project}/collections`
    root: String,
    api_key: SecretString,
}

impl DocumentClient {
    /// Create a new client from platform configuration.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn new(config: &PlatformConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let root = format!(
            "{}/{}/projects/{}/collections",
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

    /// List documents in a collection, optionally filtered on a single field.
    #[instrument(skip(self))]
    pub async fn list<T>(
        &self,
        collection: &str,
        filter: Option<(&str, &str)>,
        limit: Option<u32>,
    ) -> Result<Vec<Document<T>>, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{collection}/documents", self.inner.root);
        let mut request = self.inner.client.get(url);
        if let Some((field, value)) = filter {
            request = request.query(&[("field", field), ("equals", value)]);
        }
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response: ListResponse<T> = self.execute(request, collection).await?;
        Ok(response.documents)
    }

    /// Fetch a single document by id.
    #[instrument(skip(self))]
    pub async fn get<T>(&self, collection: &str, id: &str) -> Result<Document<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{collection}/documents/{id}", self.inner.root);
        let request = self.inner.client.get(url);
        self.execute(request, &format!("{collection}/{id}")).await
    }

    /// Create a document with a server-assigned id.
    #[instrument(skip(self, data))]
    pub async fn create<T>(&self, collection: &str, data: &T) -> Result<Document<T>, BackendError>
    where
        T: Serialize + DeserializeOwned,
    {
        let url = format!("{}/{collection}/documents", self.inner.root);
        let request = self.inner.client.post(url).json(data);
        self.execute(request, collection).await
    }

    /// Create or fully replace a document at a known id.
    #[instrument(skip(self, data))]
    pub async fn put<T>(
        &self,
        collection: &str,
        id: &str,
        data: &T,
    ) -> Result<Document<T>, BackendError>
    where
        T: Serialize + DeserializeOwned,
    {
        let url = format!("{}/{collection}/documents/{id}", self.inner.root);
        let request = self.inner.client.put(url).json(data);
        self.execute(request, &format!("{collection}/{id}")).await
    }

    /// Merge the given fields into an existing document.
    pub async fn patch(
        &self,
        collection: &str,
        id: &str,
        fields: &serde_json::Value,
    ) -> Result<Document<serde_json::Value>, BackendError> {
        let url = format!("{}/{collection}/documents/{id}", self.inner.root);
        let request = self.inner.client.patch(url).json(fields);
        self.execute(request, &format!("{collection}/{id}")).await
    }

    /// Delete a document.
    #[instrument(skip(self))]
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let url = format!("{}/{collection}/documents/{id}", self.inner.root);
        let request = self.inner.client.delete(url);
        self.send(request, &format!("{collection}/{id}")).await?;
        Ok(())
    }

    /// Send a request and return the raw body after status handling.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<String, BackendError> {
        let response = request
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            tracing::warn!(context, retry_after_secs, "platform rate limit hit");
            return Err(BackendError::RateLimited { retry_after_secs });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body, context));
        }
        Ok(body)
    }

    /// Send a request and parse the JSON body.
    async fn execute<T>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let body = self.send(request, context).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                context,
                body = %excerpt(&body),
                "failed to parse platform response"
            );
            BackendError::Parse(e.to_string())
        })
    }
}

/// Map a non-success response to a `BackendError`.
fn error_from_response(status: StatusCode, body: &str, context: &str) -> BackendError {
    if status == StatusCode::NOT_FOUND {
        return BackendError::NotFound(context.to_string());
    }
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| excerpt(body));
    tracing::warn!(status = %status, context, message = %message, "platform request failed");
    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}

/// First 500 characters of a response body, for logging.
fn excerpt(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_deserializes_wire_shape() {
        let doc: Document<serde_json::Value> = serde_json::from_value(json!({
            "id": "p1",
            "data": {"name": "Thermometer"},
            "createTime": "2026-01-15T10:00:00Z",
            "updateTime": "2026-01-16T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(doc.id, "p1");
        assert_eq!(doc.data["name"], "Thermometer");
        assert!(doc.create_time.is_some());
        assert!(doc.update_time.is_some());
    }

    #[test]
    fn test_document_timestamps_optional() {
        let doc: Document<serde_json::Value> = serde_json::from_value(json!({
            "id": "p1",
            "data": {}
        }))
        .unwrap();
        assert!(doc.create_time.is_none());
        assert!(doc.update_time.is_none());
    }

    #[test]
    fn test_list_response_defaults_to_empty() {
        let response: ListResponse<serde_json::Value> = serde_json::from_value(json!({})).unwrap();
        assert!(response.documents.is_empty());
    }

    #[test]
    fn test_error_from_response_not_found() {
        let err = error_from_response(StatusCode::NOT_FOUND, "", "products/missing");
        assert!(matches!(err, BackendError::NotFound(ref ctx) if ctx == "products/missing"));
    }

    #[test]
    fn test_error_from_response_extracts_message() {
        let body = r#"{"error": {"code": 500, "message": "backend exploded"}}"#;
        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, body, "products");
        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_response_falls_back_to_excerpt() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "<html>upstream</html>", "orders");
        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>upstream</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(2000);
        assert_eq!(excerpt(&long).len(), 500);
    }
}
