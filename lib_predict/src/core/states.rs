//! # Run States
//!
//! The two independent state machines of a submission run. Each starts in
//! `OnGoing` and leaves it exactly once, into one of its terminal states.

use std::fmt;

/// State of the outbound (example submission) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionState {
    /// Examples are still being written.
    #[default]
    OnGoing,
    /// The example source failed to produce its next element.
    ExampleReadFault,
    /// Writing to, flushing or half-closing the connection failed.
    ExampleSubmissionFault,
    /// Every example was either written or skipped, and the write side was closed.
    Complete,
}

impl SubmissionState {
    /// Whether the state is one of the terminal states.
    pub fn is_terminal(self) -> bool {
        self != SubmissionState::OnGoing
    }

    /// Whether the run ended in a fault.
    pub fn is_fault(self) -> bool {
        matches!(
            self,
            SubmissionState::ExampleReadFault | SubmissionState::ExampleSubmissionFault
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionState::OnGoing => "OnGoing",
            SubmissionState::ExampleReadFault => "ExampleReadFault",
            SubmissionState::ExampleSubmissionFault => "ExampleSubmissionFault",
            SubmissionState::Complete => "Complete",
        };
        f.write_str(name)
    }
}

/// State of the inbound (prediction fetch) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FetchState {
    /// Predictions are still being read.
    #[default]
    OnGoing,
    /// Reading from the connection failed.
    PredictionFetchFault,
    /// The daemon closed its write side, or a stop was requested.
    Complete,
}

impl FetchState {
    /// Whether the state is one of the terminal states.
    pub fn is_terminal(self) -> bool {
        self != FetchState::OnGoing
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchState::OnGoing => "OnGoing",
            FetchState::PredictionFetchFault => "PredictionFetchFault",
            FetchState::Complete => "Complete",
        };
        f.write_str(name)
    }
}
