use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelayError;

pub const INVALID_PROMPT: &str = "Invalid or missing prompt.";
pub const IMAGE_GENERATED: &str = "Image generated successfully.";

/// Output item type the Responses API uses for image tool results.
pub const IMAGE_GENERATION_CALL: &str = "image_generation_call";

/// Validated body of `POST /api/generate-image`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    /// Forwarded as given; only the emptiness check trims.
    pub prompt: String,
}

impl ImageGenerationRequest {
    pub fn parse(body: &Value) -> Result<Self, RelayError> {
        match body.get("prompt").and_then(Value::as_str) {
            Some(p) if !p.trim().is_empty() => Ok(Self {
                prompt: p.to_string(),
            }),
            _ => Err(RelayError::InvalidRequest(INVALID_PROMPT)),
        }
    }

    pub fn to_responses_payload(&self, model: &str) -> ResponsesPayload {
        ResponsesPayload {
            model: model.to_string(),
            input: self.prompt.clone(),
            tools: vec![ResponsesTool::ImageGeneration],
        }
    }
}

/// Responses API request body with a single string input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesPayload {
    pub model: String,
    pub input: String,
    pub tools: Vec<ResponsesTool>,
}

/// Built-in tools enabled on a Responses call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsesTool {
    ImageGeneration,
}

/// Success envelope of the image-generation relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub message: String,
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
}

impl GeneratedImage {
    pub fn new(image_base64: String) -> Self {
        Self {
            message: IMAGE_GENERATED.to_string(),
            image_base64,
        }
    }
}

/// Pull the generated image out of a Responses body.
///
/// Only the first `image_generation_call` item in `output` is considered; its
/// `result` must be a non-empty string.
pub fn extract_generated_image(body: &Value) -> Option<String> {
    body.get("output")
        .and_then(Value::as_array)?
        .iter()
        .find(|item| item.get("type").and_then(Value::as_str) == Some(IMAGE_GENERATION_CALL))?
        .get("result")
        .and_then(Value::as_str)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}
