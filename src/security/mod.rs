//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → secret.rs (compare X-Proxy-Secret against configured secret)
//!     → Pass to the relay handler, or 401
//! ```
//!
//! # Design Decisions
//! - One guard, applied only to the relay route; /health stays open
//! - No secret configured means no auth, per the deployment contract
//! - Fail closed: a configured secret with a missing header is a rejection

pub mod secret;

pub use secret::shared_secret_guard;
