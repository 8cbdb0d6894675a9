//! # Wire Records
//!
//! The two record kinds that cross the connection. The processor treats both
//! as opaque strings: an `Example` renders itself to one line, a `Prediction`
//! is built from one line read back from the daemon.
//!
//! - **`example`**: the `Example` trait and the verbatim `StringExample`.
//! - **`prediction`**: the `Prediction` trait and the verbatim `StringPrediction`.

/// Outbound records.
pub mod example;
/// Inbound records.
pub mod prediction;

pub use example::{Example, StringExample};
pub use prediction::{Prediction, StringPrediction};
