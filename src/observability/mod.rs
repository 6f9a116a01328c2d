//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP pipeline and batch runner produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every request span
//! - Passwords never reach a log field

pub mod logging;
pub mod metrics;
