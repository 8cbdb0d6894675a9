//! # Prediction Iterator
//!
//! The inbound side of a submission run. `Predictions` is a lazy, single
//! pass iterator: every `next()` performs one blocking line read on the
//! connection and returns as soon as a full line, end of stream or an I/O
//! fault is seen.
//!
//! ## Termination:
//!
//! 1.  **End of stream**: the daemon closed its write side after answering
//!     everything it received. Fetch state becomes `Complete`.
//! 2.  **Fault**: the read failed. Fetch state becomes `PredictionFetchFault`
//!     and nothing is yielded afterwards.
//! 3.  **Stop**: a stop was requested on the shared tracker. Checked before
//!     each read; an in-flight read is not interrupted. Fetch state becomes
//!     `Complete`.
//! 4.  **Drop**: the caller let go of the iterator before it ended. Fetch
//!     state becomes `Complete`.
//!
//! Whatever the cause, the completion callback fires once and every later
//! `next()` returns `None` without touching the connection.

use std::io::{BufRead, BufReader, Read};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::events::ExampleProcessingEventHandler;
use crate::core::progress::ProgressTracker;
use crate::core::states::FetchState;
use crate::error::PredictionFetchError;
use crate::records::Prediction;

/// Lazy, blocking iterator over the predictions of one submission run.
///
/// Not restartable: once it returned `None` it stays exhausted.
pub struct Predictions<P> {
    /// `None` once the iterator reached a terminal state.
    reader: Option<BufReader<Box<dyn Read + Send>>>,
    progress: Arc<ProgressTracker>,
    handler: Option<Arc<dyn ExampleProcessingEventHandler>>,
    line: String,
    _prediction: PhantomData<fn() -> P>,
}

impl<P: Prediction> Predictions<P> {
    /// Binds an iterator to the inbound half of a connection.
    pub fn new(
        reader: Box<dyn Read + Send>,
        progress: Arc<ProgressTracker>,
        handler: Option<Arc<dyn ExampleProcessingEventHandler>>,
    ) -> Self {
        Self {
            reader: Some(BufReader::new(reader)),
            progress,
            handler,
            line: String::new(),
            _prediction: PhantomData,
        }
    }

    /// The tracker shared with the producer of this run.
    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }
}

impl<P> Predictions<P> {
    fn finish(&mut self, state: FetchState, error: Option<PredictionFetchError>) {
        self.reader = None;

        if !self.progress.finish_fetch(state) {
            return;
        }

        match &error {
            Some(e) => log::error!("Exception while fetching predictions: {}", e),
            None => log::info!(
                "Prediction fetch complete, {} predictions read.",
                self.progress.get_total_fetched()
            ),
        }

        if let Some(handler) = &self.handler {
            if let Some(e) = &error {
                handler.on_prediction_fetch_error(&self.progress, e);
            }
            handler.on_prediction_fetch_complete(&self.progress);
        }
    }
}

impl<P: Prediction> Iterator for Predictions<P> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        if self.reader.is_none() {
            return None;
        }

        if self.progress.is_stop_requested() {
            log::info!("Stop requested, no further predictions will be read.");
            self.finish(FetchState::Complete, None);
            return None;
        }

        self.line.clear();
        let read = match self.reader.as_mut() {
            Some(reader) => reader.read_line(&mut self.line),
            None => return None,
        };

        match read {
            Ok(0) => {
                self.finish(FetchState::Complete, None);
                None
            }
            Ok(_) => {
                let mut line = std::mem::take(&mut self.line);
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                self.progress.increment_fetched();
                Some(P::from_wire_string(line))
            }
            Err(e) => {
                self.finish(FetchState::PredictionFetchFault, Some(e.into()));
                None
            }
        }
    }
}

impl<P: Prediction> FusedIterator for Predictions<P> {}

impl<P> Drop for Predictions<P> {
    fn drop(&mut self) {
        if self.reader.is_some() {
            log::debug!("Prediction iterator dropped before the end of the stream.");
            self.finish(FetchState::Complete, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::StringPrediction;
    use std::io::{self, Cursor};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FetchEvents {
        errors: Mutex<Vec<FetchState>>,
        completions: Mutex<Vec<FetchState>>,
    }

    impl ExampleProcessingEventHandler for FetchEvents {
        fn on_prediction_fetch_error(&self, progress: &ProgressTracker, _error: &PredictionFetchError) {
            self.errors.lock().unwrap().push(progress.get_fetch_state());
        }

        fn on_prediction_fetch_complete(&self, progress: &ProgressTracker) {
            self.completions.lock().unwrap().push(progress.get_fetch_state());
        }
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"))
        }
    }

    fn predictions_over(
        reader: impl Read + Send + 'static,
    ) -> (Predictions<StringPrediction>, Arc<FetchEvents>) {
        let events = Arc::new(FetchEvents::default());
        let handler: Arc<dyn ExampleProcessingEventHandler> = events.clone();
        let predictions = Predictions::new(Box::new(reader), Arc::new(ProgressTracker::new()), Some(handler));
        (predictions, events)
    }

    fn texts(predictions: &mut Predictions<StringPrediction>) -> Vec<String> {
        predictions.map(|p| p.wire_string().to_string()).collect()
    }

    #[test]
    fn test_yields_lines_in_wire_order_then_completes_once() {
        let (mut predictions, events) = predictions_over(Cursor::new("1\r\n2\n0.5 tag\n"));

        assert_eq!(texts(&mut predictions), vec!["1", "2", "0.5 tag"]);
        assert_eq!(predictions.progress().get_total_fetched(), 3);
        assert_eq!(predictions.progress().get_fetch_state(), FetchState::Complete);

        // Exhausted iterators stay exhausted and stay quiet.
        assert!(predictions.next().is_none());
        assert!(predictions.next().is_none());
        assert_eq!(*events.completions.lock().unwrap(), vec![FetchState::Complete]);
        assert!(events.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_last_line_without_terminator_is_still_a_prediction() {
        let (mut predictions, _events) = predictions_over(Cursor::new("1\n2"));
        assert_eq!(texts(&mut predictions), vec!["1", "2"]);
    }

    #[test]
    fn test_empty_stream_completes_without_predictions() {
        let (mut predictions, events) = predictions_over(Cursor::new(""));
        assert!(predictions.next().is_none());
        assert_eq!(predictions.progress().get_total_fetched(), 0);
        assert_eq!(*events.completions.lock().unwrap(), vec![FetchState::Complete]);
    }

    #[test]
    fn test_read_fault_ends_the_sequence() {
        let (mut predictions, events) = predictions_over(Cursor::new("1\n").chain(BrokenPipe));

        assert_eq!(texts(&mut predictions), vec!["1"]);
        assert_eq!(predictions.progress().get_fetch_state(), FetchState::PredictionFetchFault);
        assert!(predictions.next().is_none());

        assert_eq!(*events.errors.lock().unwrap(), vec![FetchState::PredictionFetchFault]);
        assert_eq!(*events.completions.lock().unwrap(), vec![FetchState::PredictionFetchFault]);
    }

    #[test]
    fn test_invalid_utf8_is_a_fetch_fault() {
        let (mut predictions, _events) = predictions_over(Cursor::new(vec![0xff, 0xfe, b'\n']));
        assert!(predictions.next().is_none());
        assert_eq!(predictions.progress().get_fetch_state(), FetchState::PredictionFetchFault);
    }

    #[test]
    fn test_dropping_early_completes_the_fetch_side_once() {
        let (mut predictions, events) = predictions_over(Cursor::new("1\n2\n3\n"));
        let progress = Arc::clone(&predictions.progress);
        assert_eq!(predictions.next().map(|p| p.to_string()), Some("1".to_string()));

        drop(predictions);

        assert_eq!(progress.get_fetch_state(), FetchState::Complete);
        assert_eq!(progress.get_total_fetched(), 1);
        assert_eq!(*events.completions.lock().unwrap(), vec![FetchState::Complete]);
        assert!(events.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dropping_after_the_end_does_not_fire_again() {
        let (mut predictions, events) = predictions_over(Cursor::new("1\n"));
        assert_eq!(texts(&mut predictions), vec!["1"]);

        drop(predictions);

        assert_eq!(events.completions.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_stop_request_ends_before_reading() {
        let (mut predictions, events) = predictions_over(Cursor::new("1\n2\n"));
        assert_eq!(predictions.next().map(|p| p.to_string()), Some("1".to_string()));

        predictions.progress().request_stop();
        assert!(predictions.next().is_none());
        assert_eq!(predictions.progress().get_total_fetched(), 1);
        assert_eq!(predictions.progress().get_fetch_state(), FetchState::Complete);
        assert_eq!(events.completions.lock().unwrap().len(), 1);
    }
}
