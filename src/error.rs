use axum::extract::rejection::BytesRejection;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamFailure;

/// Every way a relay request can fail. Each variant maps to exactly one response.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client-supplied fields failed validation; no upstream call was made.
    #[error("{0}")]
    InvalidRequest(&'static str),

    /// The body could not be read (over the size ceiling, or the connection failed).
    #[error(transparent)]
    BodyRejected(#[from] BytesRejection),

    /// A JSON content type was declared but the body does not parse.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The upstream call failed at the transport level or returned a non-2xx status.
    #[error("{label}.")]
    Upstream {
        label: &'static str,
        failure: UpstreamFailure,
    },

    /// The image-generation call succeeded but produced no usable image.
    #[error("No image data found in response.")]
    UpstreamEmptyResult,
}

impl RelayError {
    pub fn upstream(label: &'static str, failure: UpstreamFailure) -> Self {
        RelayError::Upstream { label, failure }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::BodyRejected(rejection) => rejection.status(),
            RelayError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { .. } | RelayError::UpstreamEmptyResult => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RelayError::InvalidRequest(msg) => json!({ "error": msg }),
            RelayError::BodyRejected(rejection) => json!({ "error": rejection.body_text() }),
            RelayError::InvalidJson(_) => json!({ "error": self.to_string() }),
            RelayError::Upstream { label, failure } => {
                let details = failure.details();
                tracing::error!(label = %label, details = %details, "upstream request failed");
                json!({ "error": self.to_string(), "details": details })
            }
            RelayError::UpstreamEmptyResult => {
                tracing::warn!("upstream response carried no image_generation_call result");
                json!({ "error": self.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
