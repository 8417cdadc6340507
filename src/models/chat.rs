use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::RelayError;

pub const INVALID_CHAT_REQUEST: &str = "Invalid request: missing model, messages, or max_tokens.";
pub const MISSING_IMAGE_OR_PROMPT: &str = "Missing image or prompt.";

/// Fixed output budget for image analysis calls.
pub const VISION_MAX_TOKENS: u32 = 500;

/// Chat Completions role enumeration (lowercase on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Validated body of `POST /api/message`.
///
/// Serializes to exactly `{model, messages, max_tokens}`, which is the upstream payload.
/// Message elements are relayed untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Value>,
    pub max_tokens: Number,
}

impl ChatRequest {
    /// `messages` must be an array, `model` a non-empty string, `max_tokens` a number.
    pub fn parse(body: &Value) -> Result<Self, RelayError> {
        let invalid = || RelayError::InvalidRequest(INVALID_CHAT_REQUEST);

        let messages = body
            .get("messages")
            .and_then(Value::as_array)
            .ok_or_else(invalid)?;
        let model = body
            .get("model")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .ok_or_else(invalid)?;
        let max_tokens = match body.get("max_tokens") {
            Some(Value::Number(n)) => n.clone(),
            _ => return Err(invalid()),
        };

        Ok(Self {
            model: model.to_string(),
            messages: messages.clone(),
            max_tokens,
        })
    }
}

/// Validated body of `POST /api/analyze-image`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysisRequest {
    /// Base64 image bytes, without a data URI prefix.
    pub image: String,
    pub prompt: String,
}

impl ImageAnalysisRequest {
    /// Both `image` and `prompt` must be non-empty strings.
    pub fn parse(body: &Value) -> Result<Self, RelayError> {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        match (field("image"), field("prompt")) {
            (Some(image), Some(prompt)) => Ok(Self { image, prompt }),
            _ => Err(RelayError::InvalidRequest(MISSING_IMAGE_OR_PROMPT)),
        }
    }

    /// Single user message holding the prompt and the image as a JPEG data URI.
    pub fn to_chat_payload(&self, model: &str) -> ChatCompletionPayload {
        ChatCompletionPayload {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: vec![
                    ContentPart::Text {
                        text: self.prompt.clone(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", self.image),
                        },
                    },
                ],
            }],
            max_tokens: VISION_MAX_TOKENS,
        }
    }
}

/// Multimodal Chat Completions request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

/// Content part of a multimodal message.
///
/// Example:
/// { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,..." } }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}
