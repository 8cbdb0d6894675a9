//! # Asynchronous, Fail-Fast Example Processor
//!
//! Submits examples to a prediction daemon over one duplex connection and
//! hands the caller a lazy iterator over the predictions coming back.
//!
//! ## Flow:
//!
//! 1.  `submit_examples` acquires a connection from the factory. A failure
//!     here is returned synchronously and no callback fires.
//! 2.  A producer is spawned on the tokio blocking pool. It writes one
//!     example per line to the outbound half, then flushes and half-closes
//!     it. The processor never joins it; callers wait for
//!     `on_example_submission_complete` instead.
//! 3.  The caller iterates the returned `Predictions` on its own thread,
//!     reading the inbound half in parallel with the producer.
//!
//! ## Failure policy:
//!
//! - An example that cannot be formatted is skipped and reported; the loop
//!   carries on.
//! - A failing example source (`ExampleReadFault`) or a failing write
//!   (`ExampleSubmissionFault`) aborts the loop. The half-close is still
//!   attempted so the daemon can finish answering what it already received.
//! - A failing flush or half-close is an `ExampleSubmissionFault` too, but
//!   never replaces a fault that was already recorded.

use std::io::{BufWriter, Write};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;

use crate::connections::{ConnectionFactory, DuplexConnection};
use crate::core::events::ExampleProcessingEventHandler;
use crate::core::progress::ProgressTracker;
use crate::core::states::{FetchState, SubmissionState};
use crate::error::{ExampleReadError, ExampleSubmissionError, ProcessorError};
use crate::processor::predictions::Predictions;
use crate::records::{Example, Prediction};

/// Record separator written after every example.
const NEWLINE: &[u8] = b"\n";

/// Capabilities advertised by a processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorFeatures {
    /// Whether predictions can be read while examples are still being submitted.
    pub is_async: bool,
    /// Content type of the prediction lines, if the processor knows it.
    pub content_type: Option<String>,
}

/// # Async Fail-Fast TCP Processor
///
/// One processor drives exactly one submission run. The example source is
/// consumed by the first successful `submit_examples`; later calls return
/// `ProcessorError::AlreadySubmitted`.
pub struct AsyncFailFastTcpProcessor<I> {
    connection_factory: Arc<dyn ConnectionFactory>,
    runtime: Handle,
    examples: Mutex<Option<I>>,
    progress: Arc<ProgressTracker>,
}

impl<I, E> AsyncFailFastTcpProcessor<I>
where
    I: IntoIterator<Item = Result<E, ExampleReadError>> + Send + 'static,
    E: Example + 'static,
{
    /// Creates a processor. `runtime` hosts the producer on its blocking pool.
    pub fn new(connection_factory: Arc<dyn ConnectionFactory>, runtime: Handle, examples: I) -> Self {
        Self {
            connection_factory,
            runtime,
            examples: Mutex::new(Some(examples)),
            progress: Arc::new(ProgressTracker::new()),
        }
    }

    /// Starts submitting examples and returns the predictions as they arrive.
    ///
    /// The returned iterator can be consumed once. Each `next()` blocks until
    /// the daemon sends a line or closes the connection.
    ///
    /// # Errors
    /// - `ProcessorError::ConnectionSetup` if no connection could be acquired.
    /// - `ProcessorError::AlreadySubmitted` if this processor already ran.
    pub fn submit_examples<P: Prediction>(
        &self,
        handler: Option<Arc<dyn ExampleProcessingEventHandler>>,
    ) -> Result<Predictions<P>, ProcessorError> {
        let mut slot = self.examples.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_none() {
            return Err(ProcessorError::AlreadySubmitted);
        }

        let connection: Arc<dyn DuplexConnection> = self
            .connection_factory
            .get_connection()
            .map(Arc::from)
            .map_err(|e| {
                log::error!("Exception communicating with the prediction daemon: {}", e);
                ProcessorError::ConnectionSetup(e)
            })?;

        let reader = connection.reader().map_err(|e| {
            log::error!("Failed to open the inbound stream: {}", e);
            ProcessorError::ConnectionSetup(e)
        })?;

        let Some(examples) = slot.take() else {
            return Err(ProcessorError::AlreadySubmitted);
        };
        drop(slot);

        let producer = Producer {
            connection,
            progress: Arc::clone(&self.progress),
            handler: handler.clone(),
        };
        let _ = self.runtime.spawn_blocking(move || producer.run(examples));

        Ok(Predictions::new(reader, Arc::clone(&self.progress), handler))
    }

    /// Capabilities of this processor.
    pub fn features(&self) -> ProcessorFeatures {
        ProcessorFeatures { is_async: true, content_type: None }
    }
}

impl<I> AsyncFailFastTcpProcessor<I> {
    /// Current submission state.
    pub fn get_submission_state(&self) -> SubmissionState {
        self.progress.get_submission_state()
    }

    /// Current fetch state.
    pub fn get_fetch_state(&self) -> FetchState {
        self.progress.get_fetch_state()
    }

    /// Examples written so far.
    pub fn get_total_submitted(&self) -> u64 {
        self.progress.get_total_submitted()
    }

    /// Examples skipped so far.
    pub fn get_total_skipped(&self) -> u64 {
        self.progress.get_total_skipped()
    }

    /// Predictions read so far.
    pub fn get_total_fetched(&self) -> u64 {
        self.progress.get_total_fetched()
    }

    /// Asks the producer and the prediction iterator to stop at their next check.
    pub fn request_stop(&self) {
        log::info!("Stop requested for example processing.");
        self.progress.request_stop();
    }

    /// Shared handle on this run's tracker, e.g. for a signal handler.
    pub fn progress(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.progress)
    }
}

/// How the example loop ended when it did not fault.
enum LoopEnd {
    Exhausted,
    Stopped,
}

/// Why the example loop aborted.
enum LoopFault {
    Read(ExampleReadError),
    Write(std::io::Error),
}

/// The outbound side of one run, moved onto the blocking pool.
struct Producer {
    connection: Arc<dyn DuplexConnection>,
    progress: Arc<ProgressTracker>,
    handler: Option<Arc<dyn ExampleProcessingEventHandler>>,
}

impl Producer {
    fn run<I, E>(self, examples: I)
    where
        I: IntoIterator<Item = Result<E, ExampleReadError>>,
        E: Example,
    {
        let mut faulted = false;

        match self.connection.writer() {
            Ok(outbound) => {
                let mut writer = BufWriter::new(outbound);
                log::info!("Starting to submit examples to the prediction daemon...");

                match self.write_examples(&mut writer, examples) {
                    Ok(end) => {
                        match end {
                            LoopEnd::Exhausted => log::info!("All examples submitted to the prediction daemon!"),
                            LoopEnd::Stopped => log::info!("Stop requested, no further examples will be submitted."),
                        }
                        faulted |= self.flush(&mut writer);
                    }
                    Err(LoopFault::Read(e)) => {
                        self.report_read_error(e);
                        faulted = true;
                        // Examples before the fault were accepted; let the daemon see them.
                        self.flush(&mut writer);
                    }
                    Err(LoopFault::Write(e)) => {
                        self.report_submission_error(ExampleSubmissionError::Write(e));
                        faulted = true;
                        // The stream is broken, drop whatever is still buffered without flushing it.
                        let _ = writer.into_parts();
                    }
                }
            }
            Err(e) => {
                self.report_submission_error(ExampleSubmissionError::OpenWriter(e));
                faulted = true;
            }
        }

        if let Err(e) = self.connection.shutdown_output() {
            self.report_submission_error(ExampleSubmissionError::HalfClose(e));
            faulted = true;
        }

        if !faulted {
            self.progress.finish_submission(SubmissionState::Complete);
        }

        let snapshot = self.progress.snapshot();
        log::info!(
            "Example submission finished in state {}: {} submitted, {} skipped.",
            snapshot.submission_state,
            snapshot.examples_submitted,
            snapshot.examples_skipped
        );

        if let Some(handler) = &self.handler {
            handler.on_example_submission_complete(&self.progress);
        }
    }

    fn write_examples<I, E, W>(&self, writer: &mut W, examples: I) -> Result<LoopEnd, LoopFault>
    where
        I: IntoIterator<Item = Result<E, ExampleReadError>>,
        E: Example,
        W: Write,
    {
        let mut examples = examples.into_iter();
        loop {
            if self.progress.is_stop_requested() {
                return Ok(LoopEnd::Stopped);
            }

            let example = match examples.next() {
                None => return Ok(LoopEnd::Exhausted),
                Some(Err(e)) => return Err(LoopFault::Read(e)),
                Some(Ok(example)) => example,
            };

            match example.to_wire_string() {
                Ok(wire) => {
                    writer
                        .write_all(wire.as_bytes())
                        .and_then(|_| writer.write_all(NEWLINE))
                        .map_err(LoopFault::Write)?;
                    self.progress.increment_submitted();
                }
                Err(e) => {
                    self.progress.increment_skipped();
                    log::warn!("Skipping example: {}", e);
                    if let Some(handler) = &self.handler {
                        handler.on_example_format_error(&self.progress, &e);
                    }
                }
            }
        }
    }

    /// Returns `true` if the flush failed.
    fn flush<W: Write>(&self, writer: &mut W) -> bool {
        match writer.flush() {
            Ok(()) => false,
            Err(e) => {
                self.report_submission_error(ExampleSubmissionError::Flush(e));
                true
            }
        }
    }

    fn report_read_error(&self, error: ExampleReadError) {
        self.progress.finish_submission(SubmissionState::ExampleReadFault);
        log::error!("Exception while reading examples: {}", error);
        if let Some(handler) = &self.handler {
            handler.on_example_read_error(&self.progress, &error);
        }
    }

    fn report_submission_error(&self, error: ExampleSubmissionError) {
        self.progress.finish_submission(SubmissionState::ExampleSubmissionFault);
        log::error!("Exception while submitting examples: {}", error);
        if let Some(handler) = &self.handler {
            handler.on_example_submission_error(&self.progress, &error);
        }
    }
}
