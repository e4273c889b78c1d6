//! Loopback mock backend for integration tests.
//!
//! A small axum router serving canned versions of every endpoint the
//! console consumes, with a few switches to simulate failures and counters
//! to observe re-fetch behavior.
#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "test-token";
pub const PASSWORD: &str = "secret";

#[derive(Clone)]
pub struct MockState {
    customer_list_hits: Arc<AtomicUsize>,
    customer_stats_hits: Arc<AtomicUsize>,
    telemetry_fails: Arc<AtomicBool>,
    failing_details: Arc<Mutex<HashSet<String>>>,
    collections: Arc<Mutex<Vec<String>>>,
}

impl MockState {
    fn new() -> Self {
        Self {
            customer_list_hits: Arc::new(AtomicUsize::new(0)),
            customer_stats_hits: Arc::new(AtomicUsize::new(0)),
            telemetry_fails: Arc::new(AtomicBool::new(false)),
            failing_details: Arc::new(Mutex::new(HashSet::new())),
            collections: Arc::new(Mutex::new(vec![
                "alpha".to_string(),
                "beta".to_string(),
            ])),
        }
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn customer_list_hits(&self) -> usize {
        self.state.customer_list_hits.load(Ordering::SeqCst)
    }

    pub fn customer_stats_hits(&self) -> usize {
        self.state.customer_stats_hits.load(Ordering::SeqCst)
    }

    pub fn fail_telemetry(&self, fail: bool) {
        self.state.telemetry_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_detail(&self, name: &str) {
        self.state
            .failing_details
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub fn set_collections(&self, names: &[&str]) {
        *self.state.collections.lock().unwrap() =
            names.iter().map(|n| n.to_string()).collect();
    }
}

pub async fn spawn() -> MockBackend {
    let state = MockState::new();
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/me", get(me))
        .route("/api/customers", get(list_customers).post(create_customer))
        .route("/api/customers/stats", get(customer_stats))
        .route(
            "/api/customers/:id",
            get(get_customer).delete(delete_customer),
        )
        .route("/api/customers/:id/upload", post(upload_document))
        .route("/api/customers/:id/documents", get(list_documents))
        .route("/api/qdrant/status", get(service_status))
        .route("/api/qdrant/collections", get(list_collections))
        .route(
            "/api/qdrant/collections/:name",
            get(collection_detail)
                .post(create_collection)
                .delete(delete_collection),
        )
        .route("/api/qdrant/cluster", get(cluster_info))
        .route("/api/qdrant/telemetry", get(telemetry))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockBackend { addr, state }
}

fn detail(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn sample_customer(id: &str) -> Value {
    json!({
        "customer_id": id,
        "name": "Acme",
        "email": "a@x.com",
        "collection_name": "acme_document",
        "quota_mb": 500,
        "used_mb": 10.0,
        "remaining_mb": 490.0,
        "usage_percent": 2.0,
        "document_count": 1,
        "active": true,
        "created_at": "2026-01-01T00:00:00",
        "last_upload": null
    })
}

async fn login(Json(body): Json<Value>) -> axum::response::Response {
    if body["password"] == PASSWORD {
        Json(json!({ "access_token": TOKEN })).into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect username or password")
    }
}

async fn logout() -> StatusCode {
    StatusCode::OK
}

async fn change_password(Json(body): Json<Value>) -> axum::response::Response {
    if body["old_password"] == PASSWORD {
        Json(json!({ "status": "ok" })).into_response()
    } else {
        detail(StatusCode::BAD_REQUEST, "Incorrect old password")
    }
}

async fn me(headers: HeaderMap) -> axum::response::Response {
    if authorized(&headers) {
        Json(json!({ "username": "admin" })).into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Invalid token")
    }
}

async fn list_customers(State(state): State<MockState>) -> Json<Value> {
    state.customer_list_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "customers": [sample_customer("c1")] }))
}

async fn customer_stats(State(state): State<MockState>) -> Json<Value> {
    state.customer_stats_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "total_customers": 1,
        "active_customers": 1,
        "total_documents": 1,
        "total_used_mb": 10.0
    }))
}

async fn get_customer(Path(id): Path<String>) -> Json<Value> {
    Json(sample_customer(&id))
}

async fn create_customer(Json(body): Json<Value>) -> axum::response::Response {
    if body["name"].as_str().unwrap_or_default().is_empty() {
        return detail(StatusCode::BAD_REQUEST, "name is required");
    }
    Json(json!({
        "customer": {
            "customer_id": "c1",
            "collection_name": "acme_document"
        }
    }))
    .into_response()
}

async fn delete_customer(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({ "status": "deleted" }))
}

async fn upload_document(Path(_id): Path<String>, body: axum::body::Bytes) -> axum::response::Response {
    if body.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "empty upload");
    }
    Json(json!({ "file_name": "report.pdf", "size_mb": 0.5 })).into_response()
}

async fn list_documents(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({
        "documents": [
            { "filename": "intro.pdf", "chunks": 4, "file_size_mb": 1.2 }
        ],
        "total_documents": 1,
        "total_chunks": 4
    }))
}

async fn service_status() -> Json<Value> {
    Json(json!({ "status": "online", "data": { "version": "1.9.0" } }))
}

async fn list_collections(State(state): State<MockState>) -> Json<Value> {
    let names: Vec<Value> = state
        .collections
        .lock()
        .unwrap()
        .iter()
        .map(|name| json!({ "name": name }))
        .collect();
    Json(json!({ "result": { "collections": names } }))
}

async fn collection_detail(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> axum::response::Response {
    if state.failing_details.lock().unwrap().contains(&name) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "detail unavailable");
    }
    Json(json!({
        "result": {
            "points_count": 10,
            "config": {
                "params": { "vectors": { "size": 384, "distance": "Cosine" } }
            }
        }
    }))
    .into_response()
}

async fn create_collection(Path(name): Path<String>) -> axum::response::Response {
    if name == "locked" {
        return detail(StatusCode::FORBIDDEN, "collection is locked");
    }
    Json(json!({ "result": true })).into_response()
}

async fn delete_collection(Path(name): Path<String>) -> axum::response::Response {
    if name == "locked" {
        return detail(StatusCode::FORBIDDEN, "collection is locked");
    }
    Json(json!({ "result": true })).into_response()
}

async fn cluster_info() -> Json<Value> {
    Json(json!({
        "result": { "peer_id": 123, "raft_info": { "role": "Leader" } }
    }))
}

async fn telemetry(State(state): State<MockState>) -> axum::response::Response {
    if state.telemetry_fails.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "telemetry exploded");
    }
    Json(json!({
        "result": {
            "collections": [
                { "vectors_count": 10 },
                { "vectors_count": 5 }
            ],
            "app": { "memory_usage": 1048576, "status": "running" }
        }
    }))
    .into_response()
}
