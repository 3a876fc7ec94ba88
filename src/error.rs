//! Error taxonomy for the relay.
//!
//! Every caller-facing failure is classified here and mapped to an HTTP
//! status exactly once, in [`RelayError::status_code`]. Handlers never
//! reinterpret errors; they convert them with `into_response` and move on.
//! Mid-stream transport failures are deliberately absent: once the 200 and
//! the first bytes are committed, a failure can only surface as a truncated
//! body, not as an error payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while relaying a completion request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Shared-secret header missing or mismatched.
    #[error("Unauthorized")]
    Unauthorized,

    /// Outbound credential was never configured; no upstream call is made.
    #[error("OPENAI_API_KEY not set")]
    MissingCredentials,

    /// Request body was not a JSON object.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Upstream kept answering 429 until the retry budget ran out.
    #[error("OpenAI repeatedly rate-limited ({attempts} attempts)")]
    RateLimitExhausted { attempts: u32 },

    /// Upstream answered with a non-200, non-429 status.
    #[error("OpenAI error {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Upstream call failed before a status line was received.
    #[error("OpenAI request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),
}

impl RelayError {
    /// Caller-facing status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
            RelayError::MissingCredentials => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::RateLimitExhausted { .. } => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
