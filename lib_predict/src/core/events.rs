//! # Processing Events
//!
//! Callbacks fired while a submission run progresses. Every method has a
//! no-op default, so a handler only overrides what it cares about.
//!
//! Callbacks run synchronously on whichever thread detected the condition:
//! submission events on the producer task, fetch events on the thread that
//! iterates the predictions. The two sides are not serialised with respect
//! to each other. Each callback receives the run's `ProgressTracker`, so
//! states and counters can be read as they are at call time.
//!
//! Guarantees per run:
//! - `on_example_submission_complete` fires exactly once, as the producer's last action.
//! - `on_prediction_fetch_complete` fires exactly once, when the prediction
//!   iterator reaches its end (end of stream, fault or stop) or is dropped before it.
//! - `on_example_format_error` fires while the submission state is still `OnGoing`.

use crate::core::progress::ProgressTracker;
use crate::error::{
    ExampleFormatError, ExampleReadError, ExampleSubmissionError, PredictionFetchError,
};

/// # Example Processing Event Handler
///
/// Receives progress and failure notifications for one submission run.
pub trait ExampleProcessingEventHandler: Send + Sync {
    /// The example source failed; submission stopped with `ExampleReadFault`.
    fn on_example_read_error(&self, _progress: &ProgressTracker, _error: &ExampleReadError) {}

    /// One example could not be formatted and was skipped.
    fn on_example_format_error(&self, _progress: &ProgressTracker, _error: &ExampleFormatError) {}

    /// Writing to the connection failed; submission stopped with `ExampleSubmissionFault`.
    fn on_example_submission_error(
        &self,
        _progress: &ProgressTracker,
        _error: &ExampleSubmissionError,
    ) {
    }

    /// The producer finished, whatever the outcome.
    fn on_example_submission_complete(&self, _progress: &ProgressTracker) {}

    /// Reading predictions failed; fetching stopped with `PredictionFetchFault`.
    fn on_prediction_fetch_error(&self, _progress: &ProgressTracker, _error: &PredictionFetchError) {}

    /// The prediction iterator finished, whatever the outcome.
    fn on_prediction_fetch_complete(&self, _progress: &ProgressTracker) {}
}

/// A handler that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventHandler;

impl ExampleProcessingEventHandler for NoopEventHandler {}
