//! In-process stub of the account backend for pipeline and flow tests.
//!
//! Routes are canned `(method path) -> (status, body)` responses; every
//! request is recorded with its `Authorization` header and body.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};

use super::api::ApiClient;
use crate::config::{ClientConfig, HttpTimeouts};
use crate::state::auth::SessionStore;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Default)]
struct StubState {
    routes: HashMap<String, (u16, String)>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

pub(crate) struct StubBackend {
    pub base_url: String,
    state: Arc<StubState>,
}

/// Builder for a [`StubBackend`].
#[derive(Default)]
pub(crate) struct StubRoutes {
    routes: HashMap<String, (u16, String)>,
}

impl StubRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, method: &str, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes.insert(format!("{method} {path}"), (status, body.to_string()));
        self
    }

    pub fn raw(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(format!("{method} {path}"), (status, body.to_owned()));
        self
    }

    pub async fn spawn(self) -> StubBackend {
        let state = Arc::new(StubState { routes: self.routes, recorded: Mutex::new(Vec::new()) });
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        StubBackend { base_url: format!("http://{addr}"), state }
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    state.recorded.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        authorization,
        body,
    });

    let key = format!("{method} {}", uri.path());
    let (status, body) = state
        .routes
        .get(&key)
        .cloned()
        .unwrap_or_else(|| (404, r#"{"detail":"Not Found"}"#.to_owned()));
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

impl StubBackend {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().unwrap().clone()
    }

    pub fn hit_count(&self) -> usize {
        self.state.recorded.lock().unwrap().len()
    }

    pub fn client(&self, session: SessionStore) -> ApiClient {
        ApiClient::new(&config_for(&self.base_url), session).unwrap()
    }
}

pub(crate) fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: base_url.to_owned(),
        state_dir: PathBuf::from("unused"),
        timeouts: HttpTimeouts { request_secs: 5, connect_secs: 2 },
    }
}

/// A base URL nothing is listening on.
pub(crate) async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A base URL whose server promises a longer body than it sends, then hangs up.
pub(crate) async fn truncated_body_base_url() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 512\r\n\r\n{\"id\"")
            .await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

pub(crate) fn user_json(id: &str, email: &str, first_name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": email,
        "first_name": first_name,
        "last_name": "Lovelace",
        "mobile_number": "1234567890",
        "role": "customer",
        "status": "active",
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00",
    })
}
