//! Local mock webhook shared by the integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::any;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const OK_REPLY: &str = r#"{"errmsg":"ok","errcode":0}"#;
pub const FAIL_REPLY: &str = r#"{"errmsg":"fail","errcode":400}"#;

/// One request as seen by the mock
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub content_type: Option<String>,
    pub query: Option<String>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

struct Shared {
    status: StatusCode,
    reply: String,
    delay: Duration,
    hits: AtomicUsize,
    requests: Mutex<Vec<Captured>>,
}

pub struct MockWebhook {
    addr: SocketAddr,
    shared: Arc<Shared>,
    server: JoinHandle<()>,
}

impl MockWebhook {
    /// Start a mock answering every request with `reply`
    ///
    /// Returns None when binding to localhost is not permitted.
    pub async fn start(reply: &str) -> Option<Self> {
        Self::start_with(StatusCode::OK, reply, Duration::ZERO).await
    }

    pub async fn start_with(status: StatusCode, reply: &str, delay: Duration) -> Option<Self> {
        let listener = match TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(err) => {
                eprintln!("skipping: cannot bind mock webhook: {err}");
                return None;
            }
        };
        let addr = listener.local_addr().ok()?;

        let shared = Arc::new(Shared {
            status,
            reply: reply.to_string(),
            delay,
            hits: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/send", any(handle))
            .with_state(shared.clone());

        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                eprintln!("mock webhook error: {err}");
            }
        });

        Some(MockWebhook {
            addr,
            shared,
            server,
        })
    }

    /// `http://<addr>/send?token=token`
    pub fn url(&self) -> String {
        format!("http://{}/send?token=token", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.shared.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.shared.requests.lock().unwrap().clone()
    }
}

impl Drop for MockWebhook {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> (StatusCode, String) {
    shared.hits.fetch_add(1, Ordering::SeqCst);
    shared.requests.lock().unwrap().push(Captured {
        method,
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        query,
        body: body.to_vec(),
    });

    if !shared.delay.is_zero() {
        tokio::time::sleep(shared.delay).await;
    }

    (shared.status, shared.reply.clone())
}

/// An address nothing is listening on
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/send?token=token")
}
