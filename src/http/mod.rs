//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound POST /chat/completions
//!     → secret guard (security subsystem)
//!     → server.rs (parse, sanitize, forward)
//!     → stream.rs (order-preserving byte relay)
//!     → caller, as text/event-stream
//! ```

pub mod server;
pub mod stream;

pub use server::{AppState, RelayServer};
