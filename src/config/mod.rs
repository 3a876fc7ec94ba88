//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → env.rs (read once, empty = unset, validate URL/addresses)
//!     → RelayConfig (immutable)
//!     → shared via Arc to server, guard, and forwarder
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so a bare environment still boots
//! - Secrets live in config but are never logged; startup logs record
//!   presence booleans only

pub mod env;
pub mod schema;

pub use env::{load_from_env, ConfigError};
pub use schema::RelayConfig;
pub use schema::RetryConfig;
