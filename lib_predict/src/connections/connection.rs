use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;

/// # Duplex Connection
///
/// A connected, full-duplex byte stream to the prediction daemon. The
/// producer only ever uses the outbound half and the prediction iterator only
/// the inbound half, so the connection is shared between two threads.
pub trait DuplexConnection: Send + Sync {
    /// Opens a handle on the inbound half (predictions from the daemon).
    fn reader(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Opens a handle on the outbound half (examples to the daemon).
    fn writer(&self) -> io::Result<Box<dyn Write + Send>>;

    /// Shuts down the write direction only, leaving the inbound half readable.
    fn shutdown_output(&self) -> io::Result<()>;
}

/// # Connection Factory
///
/// Produces an already connected duplex stream for one submission run.
pub trait ConnectionFactory: Send + Sync {
    /// Acquires a new connection.
    fn get_connection(&self) -> io::Result<Box<dyn DuplexConnection>>;
}

impl<C: DuplexConnection + ?Sized> DuplexConnection for Arc<C> {
    fn reader(&self) -> io::Result<Box<dyn Read + Send>> {
        (**self).reader()
    }

    fn writer(&self) -> io::Result<Box<dyn Write + Send>> {
        (**self).writer()
    }

    fn shutdown_output(&self) -> io::Result<()> {
        (**self).shutdown_output()
    }
}

impl DuplexConnection for TcpStream {
    fn reader(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(self.try_clone()?))
    }

    fn writer(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(self.try_clone()?))
    }

    fn shutdown_output(&self) -> io::Result<()> {
        self.shutdown(Shutdown::Write)
    }
}
