use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::RelayConfig;
use crate::upstream::UpstreamClient;

/// Load environment files, then initialize structured tracing based on RUST_LOG.
///
/// - An explicit path in ENV_FILE or DOTENV_PATH wins
/// - Otherwise the conventional `.env` discovery applies
/// - Variables already set in the process are never overwritten
pub fn init_tracing() {
    let mut env_source: String = "none".into();
    for key in ["ENV_FILE", "DOTENV_PATH"] {
        if let Ok(p) = std::env::var(key) {
            let p = p.trim();
            if !p.is_empty()
                && std::path::Path::new(p).is_file()
                && dotenvy::from_filename(p).is_ok()
            {
                env_source = format!("{p} ({key})");
                break;
            }
        }
    }

    if env_source == "none" {
        if let Ok(path) = dotenvy::dotenv() {
            env_source = path.display().to_string();
        }
    }

    // RUST_LOG may come from the env file loaded above
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Shared application state, immutable after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            upstream: UpstreamClient::from_config(config),
        }
    }

    /// State with a caller-provided HTTP client (tests use short timeouts and no proxy).
    pub fn with_http_client(config: RelayConfig, http: reqwest::Client) -> Self {
        Self {
            upstream: UpstreamClient::new(http, config),
        }
    }
}

/// Cross-origin policy: every origin, method and request header is allowed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
