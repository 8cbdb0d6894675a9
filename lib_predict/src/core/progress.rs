//! # Progress Tracker
//!
//! The single piece of mutable state shared by the producer (writing
//! examples) and the consumer (reading predictions). Counters, both state
//! machines and the stop flag live behind one `Mutex`, so a reader never
//! sees a counter update without the state change that accompanied it.
//!
//! Terminal transitions are guarded: a state only leaves `OnGoing` once, and
//! the caller learns through the returned `bool` whether its transition was
//! the one that happened. That is what keeps the completion callbacks
//! at-most-once when both a fault and a shutdown race to finish a side.

use std::sync::{Mutex, MutexGuard};

use crate::core::states::{FetchState, SubmissionState};

/// A consistent copy of every tracked value, taken under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    /// Examples written to the connection.
    pub examples_submitted: u64,
    /// Examples skipped because they could not be formatted.
    pub examples_skipped: u64,
    /// Predictions read back from the connection.
    pub predictions_fetched: u64,
    /// Current submission state.
    pub submission_state: SubmissionState,
    /// Current fetch state.
    pub fetch_state: FetchState,
    /// Whether a cooperative stop was requested.
    pub stop_requested: bool,
}

/// # Progress Tracker
///
/// Lock-guarded counters and states for one submission run. Shared between
/// the producer task and the prediction iterator as `Arc<ProgressTracker>`.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    inner: Mutex<ProgressSnapshot>,
}

impl ProgressTracker {
    /// Creates a tracker with zeroed counters and both states `OnGoing`.
    pub fn new() -> Self {
        Self::default()
    }

    // Getters must never fail, so a poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, ProgressSnapshot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns every tracked value from a single lock acquisition.
    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.lock()
    }

    /// Number of examples written so far.
    pub fn get_total_submitted(&self) -> u64 {
        self.lock().examples_submitted
    }

    /// Number of examples skipped so far.
    pub fn get_total_skipped(&self) -> u64 {
        self.lock().examples_skipped
    }

    /// Number of predictions read so far.
    pub fn get_total_fetched(&self) -> u64 {
        self.lock().predictions_fetched
    }

    /// Current submission state.
    pub fn get_submission_state(&self) -> SubmissionState {
        self.lock().submission_state
    }

    /// Current fetch state.
    pub fn get_fetch_state(&self) -> FetchState {
        self.lock().fetch_state
    }

    /// Whether `request_stop` has been called.
    pub fn is_stop_requested(&self) -> bool {
        self.lock().stop_requested
    }

    /// Asks both sides to wind down. One-way; later calls have no further effect.
    pub fn request_stop(&self) {
        self.lock().stop_requested = true;
    }

    pub(crate) fn increment_submitted(&self) {
        self.lock().examples_submitted += 1;
    }

    pub(crate) fn increment_skipped(&self) {
        self.lock().examples_skipped += 1;
    }

    pub(crate) fn increment_fetched(&self) {
        self.lock().predictions_fetched += 1;
    }

    /// Moves the submission state out of `OnGoing`.
    ///
    /// Returns `false` without changing anything if the state already left
    /// `OnGoing`, or if `state` is `OnGoing` itself.
    pub(crate) fn finish_submission(&self, state: SubmissionState) -> bool {
        let mut progress = self.lock();
        if progress.submission_state.is_terminal() || !state.is_terminal() {
            return false;
        }
        progress.submission_state = state;
        true
    }

    /// Moves the fetch state out of `OnGoing`. Same contract as `finish_submission`.
    pub(crate) fn finish_fetch(&self, state: FetchState) -> bool {
        let mut progress = self.lock();
        if progress.fetch_state.is_terminal() || !state.is_terminal() {
            return false;
        }
        progress.fetch_state = state;
        true
    }
}
