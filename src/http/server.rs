//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Build the Axum router: relay route behind the secret guard, open health
//! - Wire middleware (tracing, request timeout, body cap)
//! - Parse and sanitize inbound payloads
//! - Stream the forwarded response back with event-stream framing

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderValue};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::http::stream::relay_stream;
use crate::observability::metrics;
use crate::security::shared_secret_guard;
use crate::upstream::{sanitize, Forwarder};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
}

impl RelayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let forwarder = Forwarder::from_config(&config)?;
        let state = AppState {
            config: Arc::new(config),
            forwarder: Arc::new(forwarder),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let relay = Router::new()
            .route("/chat/completions", post(chat_completions))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                shared_secret_guard,
            ));

        Router::new()
            .merge(relay)
            .route("/health", get(health))
            .layer(TimeoutLayer::new(Duration::from_secs(
                state.config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(state.config.listener.max_body_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Relay one chat-completion request upstream and stream the answer back.
async fn chat_completions(State(state): State<AppState>, body: Bytes) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            metrics::record_request("/chat/completions", 400, start);
            return RelayError::InvalidBody("expected a JSON object".to_string()).into_response();
        }
        Err(e) => {
            metrics::record_request("/chat/completions", 400, start);
            return RelayError::InvalidBody(e.to_string()).into_response();
        }
    };

    let payload = Value::Object(sanitize(payload));

    tracing::debug!(
        request_id = %request_id,
        model = payload.get("model").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
        "Relaying completion request"
    );

    match state.forwarder.forward(&payload).await {
        Ok(upstream) => {
            metrics::record_request("/chat/completions", 200, start);

            let mut response = Response::new(Body::from_stream(relay_stream(upstream, request_id)));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/event-stream"),
            );
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert("x-request-id", value);
            }
            response
        }
        Err(err) => {
            let status = err.status_code();
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                error = %err,
                "Relay failed"
            );
            metrics::record_request("/chat/completions", status.as_u16(), start);
            err.into_response()
        }
    }
}

/// Liveness probe.
async fn health() -> impl IntoResponse {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Json(json!({ "ok": true, "ts": ts }))
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
