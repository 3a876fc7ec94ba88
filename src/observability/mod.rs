//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / forwarder / relay stream
//!     → tracing events (structured fields, request_id correlation)
//!     → metrics.rs (counters, histograms)
//!         → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments); recording never fails a request
//! - Request ID flows through log events and the x-request-id header
//! - The exporter is off by default; one env variable enables it

pub mod metrics;
