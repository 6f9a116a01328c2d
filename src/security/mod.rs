//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (pre-flight short-circuit)
//!     → Pass to routing
//!     → cors.rs (attach headers if origin.rs allows the caller)
//! ```
//!
//! # Design Decisions
//! - Origin checks are pure string comparisons against immutable config
//! - A denied origin only loses the CORS headers; it is not rejected

pub mod cors;
pub mod origin;

pub use origin::OriginPolicy;
