//! Outbound client for the OpenAI API.
//!
//! One pooled `reqwest::Client` is built at startup and reused by every handler.
//! Bodies are decoded as JSON when possible and kept as a JSON string otherwise, so
//! callers always get a `serde_json::Value` to relay.

use http::{header, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::RelayConfig;

/// Why an upstream call did not produce a usable 2xx body.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    /// The provider answered with a non-2xx status.
    #[error("upstream returned {status}")]
    Status { status: StatusCode, body: Value },

    /// The request never completed (connect, DNS, timeout, body read).
    #[error("{0}")]
    Transport(String),
}

impl UpstreamFailure {
    /// The value relayed to the client under `details`.
    ///
    /// A non-empty error body wins; an empty one falls back to a status message.
    pub fn details(&self) -> Value {
        match self {
            UpstreamFailure::Status { status, body } => {
                if is_empty_body(body) {
                    Value::String(format!(
                        "Request failed with status code {}",
                        status.as_u16()
                    ))
                } else {
                    body.clone()
                }
            }
            UpstreamFailure::Transport(msg) => Value::String(msg.clone()),
        }
    }
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(e: reqwest::Error) -> Self {
        UpstreamFailure::Transport(e.to_string())
    }
}

/// Build the outbound HTTP client from relay configuration.
///
/// Honors `no_proxy`, per-scheme proxies and the optional timeout. Falls back to a
/// default client if the builder rejects the settings.
pub fn build_http_client(config: &RelayConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }

    if config.no_proxy {
        builder = builder.no_proxy();
    } else {
        if let Some(url) = &config.http_proxy {
            match reqwest::Proxy::http(url) {
                Ok(p) => builder = builder.proxy(p),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid HTTP_PROXY"),
            }
        }
        if let Some(url) = &config.https_proxy {
            match reqwest::Proxy::https(url) {
                Ok(p) => builder = builder.proxy(p),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid HTTPS_PROXY"),
            }
        }
    }

    builder = builder.user_agent(format!("ai-relay/{}", env!("CARGO_PKG_VERSION")));

    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default HTTP client");
        reqwest::Client::new()
    })
}

/// Decode a response body: JSON when it parses, otherwise the raw text as a JSON string.
pub fn decode_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Thin wrapper pairing the pooled client with the configured authorization header.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: RelayConfig,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client, config: RelayConfig) -> Self {
        Self { http, config }
    }

    pub fn from_config(config: RelayConfig) -> Self {
        let http = build_http_client(&config);
        Self::new(http, config)
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// POST a payload to the Chat Completions endpoint.
    pub async fn chat<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Value, UpstreamFailure> {
        self.post_json(&self.config.chat_url, payload).await
    }

    /// POST a payload to the Responses endpoint.
    pub async fn responses<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Value, UpstreamFailure> {
        self.post_json(&self.config.responses_url, payload).await
    }

    /// POST `payload` as JSON with bearer auth; 2xx bodies are returned decoded.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<Value, UpstreamFailure> {
        tracing::debug!(url = %url, "forwarding request upstream");

        let resp = self
            .http
            .post(url)
            .header(header::AUTHORIZATION, self.config.authorization().clone())
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            decode_body(&bytes)
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(UpstreamFailure::Status { status, body })
        }
    }
}
