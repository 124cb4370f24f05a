// Stub backend shared by the integration tests. Each test starts its own
// instance on an ephemeral port inside the test runtime.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use percent_encoding::percent_decode_str;
use procurement_client::interface_adapters::navigator::RouteHistory;
use procurement_client::interface_adapters::storage::MemoryStore;
use procurement_client::{ClientConfig, ClientContext, ExecutionMode};
use serde_json::{Value, json};

pub const STUB_COOKIE: &str = "stub%2Btoken%3D%3D";
pub const STUB_TOKEN: &str = "stub+token==";
pub const GOOD_BEARER: &str = "good-token";

#[derive(Clone, Default)]
pub struct Backend {
    pub sanctum_hits: Arc<AtomicUsize>,
    pub fallback_hits: Arc<AtomicUsize>,
}

impl Backend {
    pub fn sanctum_hits(&self) -> usize {
        self.sanctum_hits.load(Ordering::SeqCst)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::SeqCst)
    }
}

pub struct TestServer {
    pub origin: String,
    pub backend: Backend,
}

impl TestServer {
    pub fn api_url(&self) -> String {
        format!("{}/api", self.origin)
    }
}

// Start the stub backend and return its origin (`http://127.0.0.1:<port>`).
pub async fn start_server() -> TestServer {
    let backend = Backend::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    let app = app(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    TestServer {
        origin: format!("http://{addr}"),
        backend,
    }
}

pub struct Client {
    pub context: ClientContext,
    pub tokens: Arc<MemoryStore>,
    pub routes: Arc<RouteHistory>,
}

pub fn connect(api_url: &str, mode: ExecutionMode) -> Client {
    let config = ClientConfig::new(api_url, mode).expect("valid config");
    let tokens = Arc::new(MemoryStore::new());
    let routes = Arc::new(RouteHistory::new("/dashboard"));
    let context = ClientContext::connect(config, tokens.clone(), routes.clone())
        .expect("http client should build");

    Client {
        context,
        tokens,
        routes,
    }
}

// A port nothing listens on.
pub async fn unreachable_api_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}/api")
}

fn app(backend: Backend) -> Router {
    Router::new()
        .route("/sanctum/csrf-cookie", get(sanctum_cookie))
        .route("/csrf-cookie", get(fallback_cookie))
        .route("/api/login", post(login))
        .route("/api/user", get(user))
        .route("/api/pengadaan", post(create_pengadaan))
        .route("/api/staff", post(create_staff))
        .route("/api/reports/monthly/download", get(monthly_pdf))
        .route("/api/supplier/search", get(search_supplier))
        .with_state(backend)
}

fn set_xsrf_cookie() -> Response {
    (
        StatusCode::NO_CONTENT,
        [(
            header::SET_COOKIE,
            format!("XSRF-TOKEN={STUB_COOKIE}; Max-Age=7200; Path=/; SameSite=Lax"),
        )],
    )
        .into_response()
}

async fn sanctum_cookie(State(backend): State<Backend>) -> Response {
    backend.sanctum_hits.fetch_add(1, Ordering::SeqCst);
    set_xsrf_cookie()
}

async fn fallback_cookie(State(backend): State<Backend>) -> Response {
    backend.fallback_hits.fetch_add(1, Ordering::SeqCst);
    set_xsrf_cookie()
}

// Double-submit check: the header must equal the decoded cookie.
fn csrf_matches(headers: &HeaderMap) -> bool {
    let Some(sent) = headers.get("x-xsrf-token").and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "XSRF-TOKEN")
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned());

    cookie.as_deref() == Some(sent)
}

fn token_mismatch() -> Response {
    (
        StatusCode::from_u16(419).expect("valid status"),
        Json(json!({ "message": "CSRF token mismatch." })),
    )
        .into_response()
}

async fn login(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !csrf_matches(&headers) {
        return token_mismatch();
    }
    if body["password"] != "secret" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "These credentials do not match our records." })),
        )
            .into_response();
    }
    Json(json!({ "token": GOOD_BEARER, "user": { "email": body["email"] } })).into_response()
}

async fn user(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {GOOD_BEARER}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthenticated." })),
        )
            .into_response();
    }
    Json(json!({ "id": 1, "name": "Admin" })).into_response()
}

async fn create_pengadaan(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !csrf_matches(&headers) {
        return token_mismatch();
    }
    (StatusCode::CREATED, Json(json!({ "data": body }))).into_response()
}

async fn create_staff() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "message": "The given data was invalid.",
            "errors": {
                "name": ["The name field is required."],
                "email": ["The email field is required.", "The email must be valid."]
            }
        })),
    )
        .into_response()
}

async fn monthly_pdf(Query(params): Query<HashMap<String, String>>) -> Response {
    let month = params.get("month").cloned().unwrap_or_default();
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 stub report {month}").into_bytes(),
    )
        .into_response()
}

async fn search_supplier(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "q": params.get("q") }))
}
