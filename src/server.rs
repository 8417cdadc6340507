use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{analyze_image, chat_message, generate_image};
use crate::util::{cors_layer, AppState};

/// Largest accepted request body (base64 images are large).
pub const BODY_LIMIT_BYTES: usize = 25 * 1024 * 1024;

pub const BANNER: &str = "✅ AI API Interface is running (Chat, Vision, Image Generation)";

/// Build the Axum router with the banner and the three relay endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/api/message", post(chat_message))
        .route("/api/analyze-image", post(analyze_image))
        .route("/api/generate-image", post(generate_image))
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

async fn banner() -> &'static str {
    BANNER
}
