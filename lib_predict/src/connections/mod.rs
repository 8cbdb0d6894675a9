//! # Connections Module
//!
//! How the processor obtains its duplex stream. The processor only depends on
//! the `ConnectionFactory` and `DuplexConnection` traits; `tcp` provides the
//! factory used against a real daemon.

/// Connection and factory traits.
pub mod connection;
/// Plain TCP factory.
pub mod tcp;

pub use connection::{ConnectionFactory, DuplexConnection};
pub use tcp::{TcpConnectionFactory, DEFAULT_PORT};
