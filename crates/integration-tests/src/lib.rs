//! Integration tests for MediMart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p medimart-integration-tests
//! ```
//!
//! No external services are required. Each test boots a [`StubPlatform`],
//! an in-process server that emulates the commerce platform's document
//! and identity APIs on a loopback port, then wires a real application
//! state at it through [`TestHarness`]. Tests exercise the gateway,
//! session, cart, and checkout services exactly as the storefront binary
//! does, including failure modes via [`StubPlatform::set_failing`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use medimart_storefront::config::{PlatformConfig, SentryConfig, StorefrontConfig};
use medimart_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{json, Value};

/// API key the stub hands out; long enough to pass entropy checks.
const STUB_API_KEY: &str = "x9$kQ2mV8pL4wR7nT1zF5hB3jD6gS0a";

/// A stored document with server-assigned timestamps.
#[derive(Debug, Clone)]
struct StoredDocument {
    data: Value,
    create_time: DateTime<Utc>,
    update_time: DateTime<Utc>,
}

/// A registered identity account.
#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password: String,
}

/// Shared state behind the stub's HTTP handlers.
#[derive(Debug, Clone, Default)]
struct StubState {
    collections: Arc<Mutex<HashMap<String, BTreeMap<String, StoredDocument>>>>,
    accounts: Arc<Mutex<Vec<Account>>>,
    fail: Arc<AtomicBool>,
}

impl StubState {
    fn collections(&self) -> MutexGuard<'_, HashMap<String, BTreeMap<String, StoredDocument>>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn accounts(&self) -> MutexGuard<'_, Vec<Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A 500 response when the stub has been switched into failure mode.
    fn fail_response(&self) -> Option<Response> {
        self.fail.load(Ordering::SeqCst).then(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": {"message": "stub platform is failing"}})),
            )
                .into_response()
        })
    }
}

/// In-process emulation of the commerce platform.
///
/// Speaks the same document and identity wire protocol the real platform
/// does: documents under
/// `/v1/projects/{project}/collections/{collection}/documents` and
/// accounts under `/v1/projects/{project}/accounts:{action}`.
#[derive(Debug)]
pub struct StubPlatform {
    addr: SocketAddr,
    state: StubState,
}

impl StubPlatform {
    /// Bind a loopback port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no loopback port can be bound.
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("failed to bind stub platform listener");
        let addr = listener.local_addr().expect("stub listener has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { addr, state }
    }

    /// Base URL of the running stub.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Platform configuration pointing at this stub.
    #[must_use]
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            base_url: self.base_url(),
            project: "test".to_string(),
            api_version: "v1".to_string(),
            api_key: SecretString::from(STUB_API_KEY),
        }
    }

    /// Full storefront configuration pointing at this stub.
    #[must_use]
    pub fn config(&self, cart_file: PathBuf) -> StorefrontConfig {
        StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            platform: self.platform_config(),
            cart_file,
            sentry: SentryConfig::default(),
        }
    }

    /// Make every subsequent request answer 500 (or stop doing so).
    pub fn set_failing(&self, failing: bool) {
        self.state.fail.store(failing, Ordering::SeqCst);
    }

    /// Seed a document directly, bypassing HTTP.
    pub fn seed_document(&self, collection: &str, id: &str, data: Value) {
        let now = Utc::now();
        self.state
            .collections()
            .entry(collection.to_string())
            .or_default()
            .insert(
                id.to_string(),
                StoredDocument {
                    data,
                    create_time: now,
                    update_time: now,
                },
            );
    }

    /// Read a stored document's payload, if present.
    #[must_use]
    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.state
            .collections()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| doc.data.clone())
    }

    /// Number of documents currently stored in a collection.
    #[must_use]
    pub fn document_count(&self, collection: &str) -> usize {
        self.state
            .collections()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

/// A stub platform plus a real application state wired at it.
///
/// The cart file lands in the system temp directory and is removed on
/// drop, so tests never see each other's carts.
pub struct TestHarness {
    pub platform: StubPlatform,
    pub state: AppState,
    cart_file: PathBuf,
}

impl TestHarness {
    /// Boot a stub platform and build the full service stack against it.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be constructed.
    pub async fn start() -> Self {
        let platform = StubPlatform::start().await;
        let cart_file = scratch_cart_file();
        let state = AppState::new(platform.config(cart_file.clone()))
            .expect("failed to build application state");
        state.session().initialize();
        Self {
            platform,
            state,
            cart_file,
        }
    }

    /// Path of this harness's cart file.
    #[must_use]
    pub fn cart_file(&self) -> &std::path::Path {
        &self.cart_file
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.cart_file);
    }
}

/// A unique cart file path in the system temp directory.
#[must_use]
pub fn scratch_cart_file() -> PathBuf {
    std::env::temp_dir().join(format!("medimart-test-cart-{}.json", uuid::Uuid::new_v4()))
}

fn router(state: StubState) -> Router {
    Router::new()
        .route(
            "/v1/projects/{project}/collections/{collection}/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/v1/projects/{project}/collections/{collection}/documents/{id}",
            get(get_document)
                .put(put_document)
                .patch(patch_document)
                .delete(delete_document),
        )
        .route("/v1/projects/{project}/accounts:signUp", post(sign_up))
        .route(
            "/v1/projects/{project}/accounts:signInWithPassword",
            post(sign_in),
        )
        .route("/v1/projects/{project}/accounts:update", post(update_account))
        .with_state(state)
}

fn document_json(id: &str, doc: &StoredDocument) -> Value {
    json!({
        "id": id,
        "data": doc.data,
        "createTime": doc.create_time,
        "updateTime": doc.update_time,
    })
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": {"message": "document not found"}})),
    )
        .into_response()
}

fn identity_error(token: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"message": token}})),
    )
        .into_response()
}

async fn list_documents(
    State(stub): State<StubState>,
    Path((_project, collection)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let collections = stub.collections();
    let mut documents: Vec<Value> = collections
        .get(&collection)
        .map(|docs| {
            docs.iter()
                .filter(|(_, doc)| match (params.get("field"), params.get("equals")) {
                    (Some(field), Some(wanted)) => {
                        doc.data.get(field).and_then(Value::as_str) == Some(wanted.as_str())
                    }
                    _ => true,
                })
                .map(|(id, doc)| document_json(id, doc))
                .collect()
        })
        .unwrap_or_default();
    if let Some(limit) = params.get("limit").and_then(|v| v.parse::<usize>().ok()) {
        documents.truncate(limit);
    }
    Json(json!({"documents": documents})).into_response()
}

async fn create_document(
    State(stub): State<StubState>,
    Path((_project, collection)): Path<(String, String)>,
    Json(data): Json<Value>,
) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    let doc = StoredDocument {
        data,
        create_time: now,
        update_time: now,
    };
    let body = document_json(&id, &doc);
    stub.collections()
        .entry(collection)
        .or_default()
        .insert(id, doc);
    Json(body).into_response()
}

async fn get_document(
    State(stub): State<StubState>,
    Path((_project, collection, id)): Path<(String, String, String)>,
) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let collections = stub.collections();
    collections
        .get(&collection)
        .and_then(|docs| docs.get(&id))
        .map_or_else(not_found, |doc| Json(document_json(&id, doc)).into_response())
}

async fn put_document(
    State(stub): State<StubState>,
    Path((_project, collection, id)): Path<(String, String, String)>,
    Json(data): Json<Value>,
) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let now = Utc::now();
    let mut collections = stub.collections();
    let docs = collections.entry(collection).or_default();
    let create_time = docs.get(&id).map_or(now, |existing| existing.create_time);
    let doc = StoredDocument {
        data,
        create_time,
        update_time: now,
    };
    let body = document_json(&id, &doc);
    docs.insert(id, doc);
    Json(body).into_response()
}

async fn patch_document(
    State(stub): State<StubState>,
    Path((_project, collection, id)): Path<(String, String, String)>,
    Json(fields): Json<Value>,
) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let mut collections = stub.collections();
    let Some(doc) = collections.get_mut(&collection).and_then(|docs| docs.get_mut(&id)) else {
        return not_found();
    };
    if let (Some(target), Some(updates)) = (doc.data.as_object_mut(), fields.as_object()) {
        for (key, value) in updates {
            target.insert(key.clone(), value.clone());
        }
    }
    doc.update_time = Utc::now();
    Json(document_json(&id, doc)).into_response()
}

async fn delete_document(
    State(stub): State<StubState>,
    Path((_project, collection, id)): Path<(String, String, String)>,
) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let removed = stub
        .collections()
        .get_mut(&collection)
        .and_then(|docs| docs.remove(&id));
    if removed.is_none() {
        return not_found();
    }
    StatusCode::OK.into_response()
}

async fn sign_up(State(stub): State<StubState>, Json(body): Json<Value>) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if password.len() < 8 {
        return identity_error("WEAK_PASSWORD : Password should be at least 8 characters");
    }
    let mut accounts = stub.accounts();
    if accounts.iter().any(|a| a.email == email) {
        return identity_error("EMAIL_EXISTS");
    }
    let uid = format!("stub-u{}", accounts.len() + 1);
    accounts.push(Account {
        uid: uid.clone(),
        email: email.to_string(),
        password: password.to_string(),
    });
    Json(json!({
        "localId": uid,
        "email": email,
        "idToken": format!("tok-{uid}"),
    }))
    .into_response()
}

async fn sign_in(State(stub): State<StubState>, Json(body): Json<Value>) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let accounts = stub.accounts();
    let Some(account) = accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
    else {
        return identity_error("INVALID_LOGIN_CREDENTIALS");
    };
    Json(json!({
        "localId": account.uid,
        "email": account.email,
        "idToken": format!("tok-{}", account.uid),
    }))
    .into_response()
}

async fn update_account(State(stub): State<StubState>, Json(body): Json<Value>) -> Response {
    if let Some(resp) = stub.fail_response() {
        return resp;
    }
    let token = body
        .get("idToken")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mut accounts = stub.accounts();
    let Some(account) = accounts
        .iter_mut()
        .find(|a| format!("tok-{}", a.uid) == token)
    else {
        return identity_error("INVALID_ID_TOKEN");
    };
    if password.len() < 8 {
        return identity_error("WEAK_PASSWORD : Password should be at least 8 characters");
    }
    account.password = password.to_string();
    Json(json!({
        "localId": account.uid,
        "email": account.email,
    }))
    .into_response()
}
