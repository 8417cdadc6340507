//! Request and payload models for the three relays.
//!
//! - `chat`: inbound chat and image-analysis requests, and the Chat Completions payload.
//! - `responses`: inbound image-generation request, the Responses payload, and the
//!   extraction of the generated image from the Responses output.
//!
//! Inbound bodies are validated from raw JSON by each type's `parse` so that every
//! rejection carries the endpoint's own message.

pub mod chat;
pub mod responses;

pub use chat::{
    ChatCompletionPayload, ChatMessage, ChatRequest, ContentPart, ImageAnalysisRequest, ImageUrl,
    Role,
};
pub use responses::{
    extract_generated_image, GeneratedImage, ImageGenerationRequest, ResponsesPayload,
    ResponsesTool,
};
