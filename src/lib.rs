#![forbid(unsafe_code)]
#![doc = r#"
AI Relay

Expose OpenAI chat, vision and image generation behind three small JSON endpoints.

Crate highlights
- HTTP server (in `server`): `/api/message`, `/api/analyze-image`, `/api/generate-image`.
- Every request is validated, forwarded with one upstream call, and mapped back into a
  simple envelope. Upstream failures always surface as `500 {error, details}`.

Modules
- `config`: Environment-driven configuration, read once at startup.
- `body`: Request body decoding (JSON only when declared, else an empty object).
- `models`: Inbound request validation and outbound payload shapes.
- `upstream`: Pooled HTTP client for the provider's Chat Completions and Responses endpoints.
- `handlers`: The three relay handlers.
- `error`: Error taxonomy and its JSON envelope.
- `server`: Axum router with body limit, CORS and request tracing.
- `util`: Shared state and tracing/env initialization.
"#]

pub mod body;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod server;
pub mod upstream;
pub mod util;

pub use crate::config::RelayConfig;
pub use crate::error::RelayError;
pub use crate::server::build_router;
pub use crate::upstream::{UpstreamClient, UpstreamFailure};
pub use crate::util::AppState;
