use std::time::Duration;

use http::HeaderValue;
use thiserror::Error;

/// Public OpenAI endpoint used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY not set (mandatory)")]
    MissingApiKey,

    #[error("OPENAI_API_KEY is not a valid header value")]
    InvalidApiKey,

    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("RELAY_HTTP_TIMEOUT_SECONDS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Relay configuration, read once at startup and shared read-only by every handler.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    /// Chat Completions endpoint, used by both the chat and vision relays.
    pub chat_url: String,
    /// Responses endpoint, used by the image-generation relay.
    pub responses_url: String,
    pub vision_model: String,
    pub image_model: String,
    /// Optional overall timeout for upstream calls. `None` leaves reqwest's default (no timeout).
    pub http_timeout: Option<Duration>,
    /// Disable all outbound proxies.
    pub no_proxy: bool,
    /// Outbound proxy for https upstreams.
    pub https_proxy: Option<String>,
    /// Outbound proxy for http upstreams.
    pub http_proxy: Option<String>,
    authorization: HeaderValue,
}

impl RelayConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ConfigError::InvalidApiKey)?;
        authorization.set_sensitive(true);

        let port = match get("PORT") {
            Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidPort(p))?,
            None => DEFAULT_PORT,
        };

        let base = get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base = base.trim_end_matches('/');

        let http_timeout = match get("RELAY_HTTP_TIMEOUT_SECONDS") {
            Some(s) => Some(Duration::from_secs(
                s.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout(s))?,
            )),
            None => None,
        };

        let no_proxy = get("RELAY_NO_PROXY")
            .map(|v| v.to_ascii_lowercase())
            .map(|v| v == "1" || v == "true" || v == "yes" || v == "on")
            .unwrap_or(false);

        Ok(Self {
            port,
            chat_url: format!("{base}/chat/completions"),
            responses_url: format!("{base}/responses"),
            vision_model: get("RELAY_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            image_model: get("RELAY_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            http_timeout,
            no_proxy,
            https_proxy: get("HTTPS_PROXY").or_else(|| get("https_proxy")),
            http_proxy: get("HTTP_PROXY").or_else(|| get("http_proxy")),
            authorization,
        })
    }

    /// `Authorization: Bearer <OPENAI_API_KEY>` value sent on every upstream call.
    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    /// Listen address for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
