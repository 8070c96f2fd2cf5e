//! Static language pack CDN for exercising the reqwest client.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct Cdn {
    files: HashMap<String, (u16, String)>,
    log: Vec<CapturedRequest>,
}

/// Serves the routed paths as JSON; every other path is a 404.
pub struct MockServer {
    pub addr: SocketAddr,
    cdn: Arc<Mutex<Cdn>>,
    task: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        let cdn = Arc::new(Mutex::new(Cdn::default()));
        let app = Router::new().fallback(serve).with_state(Arc::clone(&cdn));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock CDN");
        let addr = listener.local_addr().expect("mock CDN address");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, cdn, task }
    }

    /// Answer `path` with `status` and `body`.
    pub async fn route(&self, path: &str, status: u16, body: &str) {
        self.cdn
            .lock()
            .files
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.cdn.lock().log.clone()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    State(cdn): State<Arc<Mutex<Cdn>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let mut cdn = cdn.lock();
    cdn.log.push(CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    });

    let (status, body) = cdn
        .files
        .get(uri.path())
        .cloned()
        .unwrap_or((404, String::new()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [("content-type", "application/json")], body)
}
