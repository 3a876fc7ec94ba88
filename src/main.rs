//! Streaming chat-completion relay.
//!
//! Accepts OpenAI-shaped completion requests, strips fields the upstream
//! rejects, and relays the upstream's event stream back byte for byte,
//! absorbing transient 429s with bounded, hint-driven waits.
//!
//! # Architecture Overview
//!
//! ```text
//!              ┌──────────────────────────────────────────────────────┐
//!              │                        RELAY                         │
//!   Caller     │  ┌────────┐    ┌──────────┐    ┌─────────────────┐   │
//!   ───────────┼─▶│ secret │───▶│ sanitize │───▶│    forwarder    │───┼──▶ Completion
//!              │  │ guard  │    │          │    │ (bounded 429    │   │       API
//!              │  └────────┘    └──────────┘    │  retry + waits) │   │
//!              │                                └────────┬────────┘   │
//!              │                                         │            │
//!   Caller     │  ┌──────────────────────────────┐       │            │
//!   ◀──────────┼──│ byte relay (arrival order,   │◀──────┘            │
//!              │  │ text/event-stream)           │                    │
//!              │  └──────────────────────────────┘                    │
//!              └──────────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use completions_relay::config;
use completions_relay::observability::metrics;
use completions_relay::RelayServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "completions_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("completions-relay v0.1.0 starting");

    let config = config::load_from_env()?;

    if config.upstream.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; completion requests will be answered with 500");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.upstream.base_url,
        auth_enabled = config.auth.shared_secret.is_some(),
        max_attempts = config.retry.max_attempts,
        connect_timeout_secs = config.timeouts.connect_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    // Create and run HTTP server
    let server = RelayServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
