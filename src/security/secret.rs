//! Shared-secret caller guard.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::RelayError;
use crate::http::server::AppState;

/// Header carrying the caller's shared secret.
pub const PROXY_SECRET_HEADER: &str = "x-proxy-secret";

/// Reject callers that do not present the configured shared secret.
///
/// When no secret is configured every request passes through. Rejection
/// happens before any parsing or upstream work, so an unauthorized caller
/// never triggers a backend call.
pub async fn shared_secret_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.auth.shared_secret.as_deref() else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get(PROXY_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    if presented == Some(expected) {
        next.run(request).await
    } else {
        tracing::warn!(
            header_present = presented.is_some(),
            "Rejected caller with bad proxy secret"
        );
        RelayError::Unauthorized.into_response()
    }
}
