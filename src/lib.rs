//! Streaming relay for OpenAI-shaped chat completions.

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::RelayConfig;
pub use error::RelayError;
pub use http::RelayServer;
