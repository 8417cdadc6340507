#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Stand-in for the provider API, serving `/v1/chat/completions` and `/v1/responses`
/// on an ephemeral port. Counts calls and captures every payload it receives.
#[derive(Clone)]
pub struct UpstreamStub {
    base_url: String,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

#[derive(Clone)]
pub enum StubBody {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

#[derive(Clone)]
pub struct StubReply {
    pub status: StatusCode,
    pub body: StubBody,
    /// Hold the reply this long before answering.
    pub delay: Option<Duration>,
}

impl StubReply {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body: StubBody::Json(body),
            delay: None,
        }
    }

    pub fn ok(body: serde_json::Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: StubBody::Text(body.to_string()),
            delay: None,
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: StubBody::Empty,
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

struct StubState {
    chat: StubReply,
    responses: StubReply,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl UpstreamStub {
    /// Serve the same reply on both endpoints.
    pub async fn start(reply: StubReply) -> Self {
        Self::start_with(reply.clone(), reply).await
    }

    pub async fn start_with(chat: StubReply, responses: StubReply) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState {
            chat,
            responses,
            calls: calls.clone(),
            requests: requests.clone(),
        });

        let router = Router::new()
            .route("/v1/chat/completions", post(handle))
            .route("/v1/responses", post(handle))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub upstream");
        let addr = listener.local_addr().expect("stub upstream local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let server = axum::serve(listener, router.into_make_service());
        tokio::spawn(async move {
            tokio::select! {
                res = server => {
                    if let Err(err) = res {
                        eprintln!("Stub upstream server error: {err:?}");
                    }
                }
                _ = rx => {}
            }
        });

        UpstreamStub {
            base_url: format!("http://{}/v1", addr),
            calls,
            requests,
            shutdown: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Value for `OPENAI_BASE_URL`.
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn take_requests(&self) -> Vec<CapturedRequest> {
        let mut guard = self.requests.lock().expect("lock stub requests");
        guard.drain(..).collect()
    }
}

impl Drop for UpstreamStub {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.shutdown.lock() {
            if let Some(tx) = guard.take() {
                let _ = tx.send(());
            }
        }
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    if let Ok(mut guard) = state.requests.lock() {
        guard.push(CapturedRequest {
            path: uri.path().to_string(),
            authorization: header("authorization"),
            content_type: header("content-type"),
            body,
        });
    }

    let reply = if uri.path().ends_with("/responses") {
        &state.responses
    } else {
        &state.chat
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    match &reply.body {
        StubBody::Json(v) => (reply.status, Json(v.clone())).into_response(),
        StubBody::Text(t) => (reply.status, t.clone()).into_response(),
        StubBody::Empty => reply.status.into_response(),
    }
}
