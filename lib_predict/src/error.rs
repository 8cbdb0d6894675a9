//! # Error Types
//!
//! Every failure the processor can observe, grouped by the side of the
//! connection it belongs to. Setup failures come back synchronously from
//! `submit_examples`; everything else is reported through the
//! `ExampleProcessingEventHandler` callbacks and recorded in the
//! `ProgressTracker` states.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Boxed cause carried by collaborator-produced errors.
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// # Processor Error
///
/// Raised by `submit_examples` before any background work starts. No
/// callback fires for these.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The connection factory could not produce a connection, or its
    /// inbound half could not be opened.
    #[error("Failed to set up the prediction connection: {0}")]
    ConnectionSetup(#[source] io::Error),

    /// The example source was already consumed by an earlier run.
    #[error("Examples were already submitted by this processor")]
    AlreadySubmitted,
}

/// # Example Format Error
///
/// One example could not be rendered to its wire form. The example is
/// skipped and submission carries on.
#[derive(Debug, Error)]
#[error("Example could not be formatted: {message}")]
pub struct ExampleFormatError {
    message: String,
    #[source]
    cause: Option<BoxedCause>,
}

impl ExampleFormatError {
    /// Creates a format error with a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), cause: None }
    }

    /// Creates a format error wrapping an underlying cause.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        Self { message: message.into(), cause: Some(cause.into()) }
    }

    /// The human readable reason.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// # Example Read Error
///
/// The example source failed to produce its next element. Fatal to the
/// submission run.
#[derive(Debug, Error)]
#[error("Failed to read the next example: {message}")]
pub struct ExampleReadError {
    message: String,
    #[source]
    cause: Option<BoxedCause>,
}

impl ExampleReadError {
    /// Creates a read error with a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), cause: None }
    }

    /// Creates a read error wrapping an underlying cause.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        Self { message: message.into(), cause: Some(cause.into()) }
    }

    /// The human readable reason.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for ExampleReadError {
    fn from(e: io::Error) -> Self {
        Self::with_cause(e.to_string(), e)
    }
}

/// # Example Submission Error
///
/// Anything that went wrong on the outbound half of the connection.
#[derive(Debug, Error)]
pub enum ExampleSubmissionError {
    /// The outbound half could not be opened.
    #[error("Failed to open the outbound stream: {0}")]
    OpenWriter(#[source] io::Error),

    /// Writing an example failed.
    #[error("Failed to write an example: {0}")]
    Write(#[source] io::Error),

    /// Buffered examples could not be flushed to the connection.
    #[error("Failed to flush examples: {0}")]
    Flush(#[source] io::Error),

    /// Shutting down the write direction of the connection failed.
    #[error("Failed to half-close the connection: {0}")]
    HalfClose(#[source] io::Error),
}

/// # Prediction Fetch Error
///
/// An I/O failure while reading predictions from the inbound half.
#[derive(Debug, Error)]
pub enum PredictionFetchError {
    /// Reading a line failed (including invalid UTF-8 on the wire).
    #[error("Failed to read a prediction: {0}")]
    Read(#[from] io::Error),
}
