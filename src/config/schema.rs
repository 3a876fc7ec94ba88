//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! Defaults mirror the reference deployment; the environment loader in
//! `env.rs` overrides individual fields at startup.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, body cap).
    pub listener: ListenerConfig,

    /// Upstream completion API settings.
    pub upstream: UpstreamConfig,

    /// Caller authentication settings.
    pub auth: AuthConfig,

    /// Rate-limit retry settings.
    pub retry: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum inbound request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Upstream completion API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the completion API, without a trailing slash.
    pub base_url: String,

    /// Bearer token for outbound calls. `None` means unconfigured; requests
    /// are answered with 500 rather than forwarded with an empty token.
    pub api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
        }
    }
}

/// Caller authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret expected in the `X-Proxy-Secret` header. `None`
    /// disables the guard entirely.
    pub shared_secret: Option<String>,
}

/// Rate-limit retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per request, including the first (not retries-after).
    pub max_attempts: u32,

    /// Wait used when the 429 body carries no usable hint, in seconds.
    pub default_delay_secs: f64,

    /// Safety buffer added on top of the hinted or default wait, in seconds.
    pub delay_buffer_secs: f64,

    /// Upper bound on any single wait, in seconds.
    pub max_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_delay_secs: 2.5,
            delay_buffer_secs: 0.3,
            max_delay_secs: 6.0,
        }
    }
}

/// Timeout configuration.
///
/// The upstream read phase is deliberately unbounded: completion streams may
/// run arbitrarily long, so only connection establishment gets a deadline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection-establish timeout in seconds.
    pub connect_secs: u64,

    /// Inbound time-to-response-headers bound in seconds. Must cover the
    /// worst pre-stream case (all connects plus all capped retry waits);
    /// streaming bodies are not affected.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter when RUST_LOG is not set.
    pub log_level: String,

    /// Whether to expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address for the Prometheus scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
