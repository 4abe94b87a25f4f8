//! Shared test harness: an in-process mock of the hosted backend.
//!
//! The mock speaks just enough of the backend's three surfaces (table
//! REST, object storage, auth) for the real clients to run against it
//! unchanged, and records what the clients did: stored rows, uploaded
//! objects, peak upload concurrency, and role-check traffic.
//!
//! Failure injection:
//! - `fail_role_checks` - `user_roles` reads answer 500
//! - uploading with content type `image/fail` - storage answers 500
//! - `fail_insert_names` - product inserts with that name answer 500

#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use uuid::Uuid;

/// How long the mock holds each storage upload; long enough that files in
/// the same batch demonstrably overlap.
const UPLOAD_DELAY: Duration = Duration::from_millis(25);

/// Recorded state of the mock backend.
#[derive(Default)]
pub struct MockState {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    rest_hits: Mutex<HashMap<String, usize>>,

    /// Registered accounts: email -> (password, user record).
    accounts: Mutex<HashMap<String, (String, Value)>>,
    /// Live access tokens: token -> user record.
    tokens: Mutex<HashMap<String, Value>>,

    /// Uploaded object keys, in arrival order.
    uploads: Mutex<Vec<String>>,
    inflight_uploads: AtomicUsize,
    max_inflight_uploads: AtomicUsize,

    /// When set, `user_roles` reads answer 500.
    pub fail_role_checks: AtomicBool,
    role_check_hits: AtomicUsize,

    /// Product names whose insert answers 500.
    fail_insert_names: Mutex<HashSet<String>>,
}

impl MockState {
    /// Rows currently stored in a table.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed a row directly (no id/timestamp generation).
    pub fn seed_row(&self, table: &str, row: Value) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Uploaded object keys.
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// Highest number of simultaneously in-flight uploads observed.
    pub fn max_concurrent_uploads(&self) -> usize {
        self.max_inflight_uploads.load(Ordering::SeqCst)
    }

    /// How many times `user_roles` was read.
    pub fn role_check_hits(&self) -> usize {
        self.role_check_hits.load(Ordering::SeqCst)
    }

    /// How many times a table was read.
    pub fn rest_hits(&self, table: &str) -> usize {
        self.rest_hits
            .lock()
            .unwrap()
            .get(table)
            .copied()
            .unwrap_or(0)
    }

    /// Make product inserts with this name fail.
    pub fn fail_insert_named(&self, name: &str) {
        self.fail_insert_names
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    /// Register an account for the password grant.
    pub fn register_account(&self, email: &str, password: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        let user = json!({
            "id": user_id,
            "email": email,
            "user_metadata": {},
        });
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), user));
        user_id
    }

    /// Register a live access token for a user.
    pub fn register_token(&self, token: &str, user_id: Uuid, email: &str) {
        let user = json!({
            "id": user_id,
            "email": email,
            "user_metadata": {},
        });
        self.tokens.lock().unwrap().insert(token.to_string(), user);
    }

    /// Grant the admin role to a user.
    pub fn grant_admin(&self, user_id: Uuid) {
        self.seed_row("user_roles", json!({ "user_id": user_id, "role": "admin" }));
    }
}

/// A running mock backend.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    /// Admin configuration pointing at this mock.
    #[must_use]
    pub fn admin_config(&self) -> maison_admin::config::AdminConfig {
        maison_admin::config::AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            public_url: "http://localhost:3000".to_string(),
            storage_bucket: "product-images".to_string(),
            backend: maison_admin::config::BackendConfig::new(
                self.base_url.clone(),
                "mock-service-key",
            ),
            sentry_dsn: None,
        }
    }

    /// Storefront configuration pointing at this mock.
    #[must_use]
    pub fn storefront_config(&self) -> maison_storefront::config::StorefrontConfig {
        storefront_config_for(&self.base_url)
    }
}

/// Storefront configuration for an arbitrary backend URL (e.g. a dead
/// port, to exercise fallback content).
#[must_use]
pub fn storefront_config_for(base_url: &str) -> maison_storefront::config::StorefrontConfig {
    maison_storefront::config::StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "https://shop.example.com".to_string(),
        backend: maison_storefront::config::BackendConfig::new(base_url, "mock-anon-key"),
        sentry_dsn: None,
    }
}

/// Start the mock backend on an ephemeral port.
pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route(
            "/rest/v1/{table}",
            get(table_select)
                .post(table_insert)
                .patch(table_patch)
                .delete(table_delete),
        )
        .route("/storage/v1/object/{bucket}/{*path}", post(storage_upload))
        .route("/auth/v1/token", post(auth_token))
        .route("/auth/v1/signup", post(auth_signup))
        .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route("/auth/v1/user", get(auth_user))
        .route("/auth/v1/admin/users", get(admin_list_users).post(admin_create_user))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

// =============================================================================
// Table surface
// =============================================================================

/// Parse `col=eq.value` style filters out of the query string.
fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map_or_else(Vec::new, |q| {
        url::form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    })
}

/// Stringify a JSON value the way filters compare it.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches_filters(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, op)| {
        if let Some(value) = op.strip_prefix("eq.") {
            row.get(column).is_some_and(|v| scalar(v) == value)
        } else if op == "is.null" {
            row.get(column).is_none_or(Value::is_null)
        } else {
            // Unrecognized operators (order, or, ...) are not filters.
            true
        }
    })
}

fn row_filters(params: &[(String, String)]) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "select" | "order" | "limit" | "or"))
        .cloned()
        .collect()
}

async fn table_select(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    RawQuery(raw): RawQuery,
) -> Response {
    *state
        .rest_hits
        .lock()
        .unwrap()
        .entry(table.clone())
        .or_insert(0) += 1;

    if table == "user_roles" {
        state.role_check_hits.fetch_add(1, Ordering::SeqCst);
        if state.fail_role_checks.load(Ordering::SeqCst) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "role lookup exploded" })),
            )
                .into_response();
        }
    }

    let params = parse_query(raw.as_deref());
    let filters = row_filters(&params);
    let limit = params
        .iter()
        .find(|(k, _)| k == "limit")
        .and_then(|(_, v)| v.parse::<usize>().ok());

    let mut rows: Vec<Value> = state
        .rows(&table)
        .into_iter()
        .filter(|row| matches_filters(row, &filters))
        .collect();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    let total = rows.len();
    let mut headers = HeaderMap::new();
    headers.insert(
        "content-range",
        format!("0-{}/{total}", total.saturating_sub(1)).parse().unwrap(),
    );

    (headers, Json(rows)).into_response()
}

async fn table_insert(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let rows = match body {
        Value::Array(rows) => rows,
        single => vec![single],
    };

    let mut stored = Vec::new();
    for mut row in rows {
        if table == "products" {
            let name = row.get("name").map(scalar).unwrap_or_default();
            if state.fail_insert_names.lock().unwrap().contains(&name) {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "insert rejected" })),
                )
                    .into_response();
            }
        }

        let object = row.as_object_mut().expect("insert body must be an object");
        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        object
            .entry("created_at")
            .or_insert_with(|| Value::String("2026-01-01T00:00:00+00:00".to_string()));

        state.seed_row(&table, row.clone());
        stored.push(row);
    }

    (StatusCode::CREATED, Json(Value::Array(stored))).into_response()
}

async fn table_patch(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    RawQuery(raw): RawQuery,
    Json(patch): Json<Value>,
) -> Response {
    let params = parse_query(raw.as_deref());
    let filters = row_filters(&params);
    let patch = patch.as_object().cloned().unwrap_or_default();

    let mut tables = state.tables.lock().unwrap();
    let rows = tables.entry(table).or_default();

    let mut updated = Vec::new();
    for row in rows.iter_mut().filter(|row| matches_filters(row, &filters)) {
        if let Some(object) = row.as_object_mut() {
            for (key, value) in &patch {
                object.insert(key.clone(), value.clone());
            }
        }
        updated.push(row.clone());
    }

    (StatusCode::OK, Json(Value::Array(updated))).into_response()
}

async fn table_delete(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    RawQuery(raw): RawQuery,
) -> StatusCode {
    let params = parse_query(raw.as_deref());
    let filters = row_filters(&params);

    let mut tables = state.tables.lock().unwrap();
    let rows = tables.entry(table).or_default();
    rows.retain(|row| !matches_filters(row, &filters));

    StatusCode::NO_CONTENT
}

// =============================================================================
// Storage surface
// =============================================================================

async fn storage_upload(
    State(state): State<Arc<MockState>>,
    Path((_bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    _body: axum::body::Bytes,
) -> Response {
    let inflight = state.inflight_uploads.fetch_add(1, Ordering::SeqCst) + 1;
    state
        .max_inflight_uploads
        .fetch_max(inflight, Ordering::SeqCst);

    tokio::time::sleep(UPLOAD_DELAY).await;
    state.inflight_uploads.fetch_sub(1, Ordering::SeqCst);

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if content_type == "image/fail" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "upload rejected" })),
        )
            .into_response();
    }

    state.uploads.lock().unwrap().push(path.clone());
    (StatusCode::OK, Json(json!({ "Key": path }))).into_response()
}

// =============================================================================
// Auth surface
// =============================================================================

async fn auth_token(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    let email = body.get("email").map(scalar).unwrap_or_default();
    let password = body.get("password").map(scalar).unwrap_or_default();

    let accounts = state.accounts.lock().unwrap();
    match accounts.get(&email) {
        Some((stored_password, user)) if *stored_password == password => {
            let token = Uuid::new_v4().to_string();
            let user = user.clone();
            drop(accounts);

            state
                .tokens
                .lock()
                .unwrap()
                .insert(token.clone(), user.clone());

            Json(json!({
                "access_token": token,
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": Uuid::new_v4().to_string(),
                "user": user,
            }))
            .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
            })),
        )
            .into_response(),
    }
}

async fn auth_signup(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    let email = body.get("email").map(scalar).unwrap_or_default();
    let password = body.get("password").map(scalar).unwrap_or_default();

    if state.accounts.lock().unwrap().contains_key(&email) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "msg": "User already registered" })),
        )
            .into_response();
    }

    let user_id = state.register_account(&email, &password);
    let metadata = body.get("data").cloned().unwrap_or_else(|| json!({}));

    Json(json!({
        "id": user_id,
        "email": email,
        "user_metadata": metadata,
    }))
    .into_response()
}

async fn auth_user(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    match state.tokens.lock().unwrap().get(token) {
        Some(user) => Json(user.clone()).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        )
            .into_response(),
    }
}

async fn admin_list_users(State(state): State<Arc<MockState>>) -> Response {
    let users: Vec<Value> = state
        .accounts
        .lock()
        .unwrap()
        .values()
        .map(|(_, user)| user.clone())
        .collect();

    Json(json!({ "users": users })).into_response()
}

async fn admin_create_user(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    let email = body.get("email").map(scalar).unwrap_or_default();
    let password = body.get("password").map(scalar).unwrap_or_default();
    let user_id = state.register_account(&email, &password);

    Json(json!({
        "id": user_id,
        "email": email,
        "user_metadata": body.get("user_metadata").cloned().unwrap_or_else(|| json!({})),
    }))
    .into_response()
}
