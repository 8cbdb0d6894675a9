//! # Example Processor Module
//!
//! The two halves of a submission run.
//!
//! - **`submitter`**: `AsyncFailFastTcpProcessor`, which acquires the
//!   connection, runs the producer on the tokio blocking pool and returns
//!   the prediction iterator.
//! - **`predictions`**: `Predictions`, the lazy blocking iterator over the
//!   inbound half.

/// Connection setup and the example producer.
pub mod submitter;
/// Lazy iterator over the daemon's answers.
pub mod predictions;

pub use predictions::Predictions;
pub use submitter::{AsyncFailFastTcpProcessor, ProcessorFeatures};
