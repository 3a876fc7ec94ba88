//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! sanitized payload
//!     → forwarder.rs (POST, bearer auth, accept: text/event-stream)
//!         → 429: backoff.rs computes wait → sleep → re-attempt (max 3)
//!         → other non-200: classified error, no retry
//!         → 200: open byte stream handed to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Retries are confined to the pre-streaming phase by construction:
//!   `forward` returns the open exchange, after which no retry path exists
//! - The 429 wait hint is parsed from the error body text, matching the
//!   upstream's wording, with a fixed default when absent
//! - One shared client; per-request state is just the attempt counter

pub mod backoff;
pub mod forwarder;
pub mod sanitize;

pub use forwarder::Forwarder;
pub use sanitize::sanitize;
