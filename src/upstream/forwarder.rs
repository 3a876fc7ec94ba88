//! Rate-limit-aware upstream forwarding.
//!
//! # Responsibilities
//! - Hold the shared upstream client (bounded connect, unbounded read)
//! - Classify each attempt: opened, rate limited, or refused
//! - Absorb bounded 429 streaks with computed waits
//! - Hand the open 200 exchange to the HTTP layer for relaying

use std::time::Duration;

use serde_json::Value;

use crate::config::{RelayConfig, RetryConfig};
use crate::error::RelayError;
use crate::observability::metrics;
use crate::upstream::backoff::{parse_retry_hint, retry_delay};

/// Completion endpoint path, joined to the configured base URL.
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Outcome of a single upstream attempt.
enum AttemptOutcome {
    /// 200 with an open body stream; relaying may begin.
    Opened(reqwest::Response),
    /// 429; the body is kept for the wait hint.
    RateLimited { body: String },
    /// Any other status; terminal, never retried.
    Refused { status: reqwest::StatusCode, body: String },
}

/// Upstream forwarder with bounded rate-limit retries.
///
/// Retries live entirely inside [`Forwarder::forward`]: the method returns
/// the open 200 exchange, so by the time any byte can reach the caller the
/// retry loop has already exited and cannot re-enter.
pub struct Forwarder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl Forwarder {
    /// Build the shared client and endpoint from configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        // Connection setup must fail fast; reads stay unbounded because
        // completion streams may run arbitrarily long.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.upstream.base_url, CHAT_COMPLETIONS_PATH),
            api_key: config.upstream.api_key.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Forward a sanitized payload, retrying through transient rate limits.
    ///
    /// Returns the open 200 response once the upstream starts streaming.
    /// Every rate-limited attempt re-sends the same payload; this is safe
    /// only because nothing has been relayed to the caller yet.
    pub async fn forward(&self, payload: &Value) -> Result<reqwest::Response, RelayError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RelayError::MissingCredentials);
        };

        let mut attempt = 1u32;
        loop {
            let outcome = match self.attempt(api_key, payload).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    metrics::record_upstream_attempt("transport_error");
                    tracing::warn!(attempt, error = %e, "Upstream request failed");
                    return Err(e);
                }
            };

            match outcome {
                AttemptOutcome::Opened(response) => {
                    metrics::record_upstream_attempt("opened");
                    tracing::debug!(attempt, "Upstream stream opened");
                    return Ok(response);
                }
                AttemptOutcome::RateLimited { body } => {
                    metrics::record_upstream_attempt("rate_limited");
                    if attempt >= self.retry.max_attempts {
                        tracing::warn!(attempt, "Upstream rate-limit budget exhausted");
                        return Err(RelayError::RateLimitExhausted { attempts: attempt });
                    }

                    let wait = retry_delay(parse_retry_hint(&body), &self.retry);
                    tracing::warn!(
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "Upstream rate limited, backing off"
                    );
                    metrics::record_retry_wait(wait);
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                AttemptOutcome::Refused { status, body } => {
                    metrics::record_upstream_attempt("refused");
                    tracing::warn!(attempt, status = status.as_u16(), "Upstream refused request");
                    return Err(RelayError::UpstreamStatus { status: status.as_u16(), body });
                }
            }
        }
    }

    /// Open one outbound exchange and classify the response status.
    async fn attempt(&self, api_key: &str, payload: &Value) -> Result<AttemptOutcome, RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(payload)
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(AttemptOutcome::Opened(response)),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Ok(AttemptOutcome::RateLimited {
                body: read_body_lossy(response).await,
            }),
            status => Ok(AttemptOutcome::Refused {
                status,
                body: read_body_lossy(response).await,
            }),
        }
    }
}

/// Read an error body as text, tolerating undecodable bytes.
async fn read_body_lossy(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}
