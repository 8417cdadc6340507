#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use ai_relay::{build_router, AppState, RelayConfig};
use axum::http;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Discard port; anything sent here fails fast with connection refused.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9/v1";

pub const TEST_API_KEY: &str = "sk-relay-test";

/// The relay router bound to an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub addr: SocketAddr,
    join: JoinHandle<()>,
    client: reqwest::Client,
}

impl TestServer {
    fn make_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed building reqwest client")
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    pub async fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(http::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
    }

    /// Low-level POST with raw bytes.
    pub async fn post_bytes(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(http::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Relay configuration pointing at `upstream_base`, without touching process env.
pub fn test_config(upstream_base: &str, extra: &[(&str, &str)]) -> RelayConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("OPENAI_API_KEY".into(), TEST_API_KEY.into());
    vars.insert("OPENAI_BASE_URL".into(), upstream_base.into());
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    RelayConfig::from_lookup(|key| vars.get(key).cloned()).expect("test relay config")
}

/// App state with a short-timeout, proxy-free client so unreachable upstreams fail fast.
pub fn test_state(config: RelayConfig) -> AppState {
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .connect_timeout(Duration::from_millis(500))
        .build()
        .expect("test http client");
    AppState::with_http_client(config, http)
}

pub async fn spawn_relay(config: RelayConfig) -> TestServer {
    spawn_with_state(test_state(config)).await
}

pub async fn spawn_with_state(state: AppState) -> TestServer {
    let app = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{}", addr);
    let server = axum::serve(listener, app.into_make_service());

    let join = tokio::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("Test server error: {e:?}");
        }
    });

    TestServer {
        base_url,
        addr,
        join,
        client: TestServer::make_client(),
    }
}

/// Spawn the relay against the given upstream base URL with default settings.
pub async fn spawn_against(upstream_base: &str) -> TestServer {
    spawn_relay(test_config(upstream_base, &[])).await
}

pub fn sample_chat_request() -> serde_json::Value {
    serde_json::json!({
        "model": "gpt-4o-mini",
        "messages": [
            {"role": "system", "content": "You are terse."},
            {"role": "user", "content": "Hello relay"}
        ],
        "max_tokens": 128
    })
}

pub fn sample_chat_completion() -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hi."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14}
    })
}
