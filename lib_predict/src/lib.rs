//! # lib_predict
//!
//! Client side of a line-oriented streaming prediction daemon. Examples are
//! written one per line on the outbound half of a single duplex connection
//! while predictions are read back, lazily and in parallel, from its inbound
//! half.
//!
//! ```rust,ignore
//! let runtime = tokio::runtime::Runtime::new()?;
//! let factory = Arc::new(TcpConnectionFactory::new("localhost", 26542));
//! let examples = vec![Ok(StringExample::new("|f a b c"))];
//!
//! let processor = AsyncFailFastTcpProcessor::new(factory, runtime.handle().clone(), examples);
//! for prediction in processor.submit_examples::<StringPrediction>(None)? {
//!     println!("{}", prediction);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod error;
pub mod records;
pub mod core;
pub mod connections;
pub mod processor;

#[cfg(feature = "configs")]
pub mod configs;
#[cfg(feature = "loggers")]
pub mod loggers;

// Re-export everything
pub use crate::core::{
    ExampleProcessingEventHandler, FetchState, NoopEventHandler, ProgressSnapshot, ProgressTracker,
    SubmissionState,
};
pub use connections::{ConnectionFactory, DuplexConnection, TcpConnectionFactory};
pub use error::*;
pub use processor::{AsyncFailFastTcpProcessor, Predictions, ProcessorFeatures};
pub use records::{Example, Prediction, StringExample, StringPrediction};
