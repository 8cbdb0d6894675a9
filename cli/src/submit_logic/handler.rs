use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use lib_predict::{
    ExampleProcessingEventHandler, ExampleReadError, ExampleSubmissionError, PredictionFetchError, ProgressTracker,
    SubmissionState,
};

/// Logs the terminal events of a run. Skipped examples are already logged by the producer.
///
/// The final submission state is also sent once on the receiver returned by `new`.
#[derive(Debug)]
pub struct LoggingHandler {
    submission_done: Mutex<Option<Sender<SubmissionState>>>,
}

impl LoggingHandler {
    pub fn new() -> (Self, Receiver<SubmissionState>) {
        let (tx, rx) = mpsc::channel();
        let handler = LoggingHandler {
            submission_done: Mutex::new(Some(tx)),
        };
        (handler, rx)
    }
}

impl ExampleProcessingEventHandler for LoggingHandler {
    fn on_example_read_error(&self, progress: &ProgressTracker, error: &ExampleReadError) {
        log::error!(
            "Reading examples failed after {} submitted: {}",
            progress.get_total_submitted(),
            error
        );
    }

    fn on_example_submission_error(&self, progress: &ProgressTracker, error: &ExampleSubmissionError) {
        log::error!(
            "Sending examples failed after {} submitted: {}",
            progress.get_total_submitted(),
            error
        );
    }

    fn on_example_submission_complete(&self, progress: &ProgressTracker) {
        log::info!(
            "Submission finished: {} ({} submitted, {} skipped)",
            progress.get_submission_state(),
            progress.get_total_submitted(),
            progress.get_total_skipped()
        );
        let sender = self.submission_done.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(tx) = sender {
            let _ = tx.send(progress.get_submission_state());
        }
    }

    fn on_prediction_fetch_error(&self, progress: &ProgressTracker, error: &PredictionFetchError) {
        log::error!(
            "Reading predictions failed after {} fetched: {}",
            progress.get_total_fetched(),
            error
        );
    }

    fn on_prediction_fetch_complete(&self, progress: &ProgressTracker) {
        log::debug!(
            "Fetching finished: {} ({} fetched)",
            progress.get_fetch_state(),
            progress.get_total_fetched()
        );
    }
}
