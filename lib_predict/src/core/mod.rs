//! # Core Run State Module
//!
//! Everything the two sides of a submission run share: the state machines,
//! the lock-guarded progress tracker and the event callback contract.
//!
//! ## Core Components:
//!
//! - **`states`**: `SubmissionState` and `FetchState`, the two independent
//!   state machines. Each leaves `OnGoing` exactly once.
//!
//! - **`progress`**: `ProgressTracker`, the only mutable state touched by both
//!   the producer and the prediction iterator. Counters and states are read
//!   and written under one lock.
//!
//! - **`events`**: `ExampleProcessingEventHandler`, the optional callback
//!   interface through which callers learn about faults and completion.

/// Submission and fetch state machines.
pub mod states;
/// Lock-guarded counters and states shared by both sides of a run.
pub mod progress;
/// Optional callbacks for faults and completion.
pub mod events;

// --- Public API Re-exports ---
pub use events::{ExampleProcessingEventHandler, NoopEventHandler};
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use states::{FetchState, SubmissionState};
