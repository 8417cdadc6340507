use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use http::HeaderMap;
use serde_json::Value;

use crate::body::json_or_empty;
use crate::error::RelayError;
use crate::models::{
    extract_generated_image, ChatRequest, GeneratedImage, ImageAnalysisRequest,
    ImageGenerationRequest,
};
use crate::util::AppState;

pub const CHAT_COMPLETION_ERROR: &str = "Chat Completion Error";
pub const IMAGE_ANALYSIS_ERROR: &str = "Image Analysis Error";
pub const IMAGE_GENERATION_ERROR: &str = "Image Generation Error";

/// Forward a chat request as `{model, messages, max_tokens}` and return the upstream body.
pub async fn chat_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, RelayError> {
    let body = json_or_empty(&headers, body)?;
    let req = ChatRequest::parse(&body)?;

    let reply = state
        .upstream
        .chat(&req)
        .await
        .map_err(|e| RelayError::upstream(CHAT_COMPLETION_ERROR, e))?;
    Ok(Json(reply))
}

/// Wrap prompt and image into a single vision message and return the upstream body.
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, RelayError> {
    let body = json_or_empty(&headers, body)?;
    let req = ImageAnalysisRequest::parse(&body)?;
    let payload = req.to_chat_payload(&state.upstream.config().vision_model);

    let reply = state
        .upstream
        .chat(&payload)
        .await
        .map_err(|e| RelayError::upstream(IMAGE_ANALYSIS_ERROR, e))?;
    Ok(Json(reply))
}

/// Ask the Responses API for an image and return only the base64 result.
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GeneratedImage>, RelayError> {
    let body = json_or_empty(&headers, body)?;
    let req = ImageGenerationRequest::parse(&body)?;
    let payload = req.to_responses_payload(&state.upstream.config().image_model);

    let reply = state
        .upstream
        .responses(&payload)
        .await
        .map_err(|e| RelayError::upstream(IMAGE_GENERATION_ERROR, e))?;

    let image = extract_generated_image(&reply).ok_or(RelayError::UpstreamEmptyResult)?;
    Ok(Json(GeneratedImage::new(image)))
}
