//! Batch mode.
//!
//! # Data Flow
//! ```text
//! input dir (listed once)
//!     → BatchRunner::discover (Vec<BatchJob>)
//!     → per job: prompt → read → sniff → decrypt → write
//!     → BatchSummary
//! ```

pub mod runner;

pub use runner::{BatchError, BatchJob, BatchRunner, BatchSummary, JobError};
