//! TCP connection factory.
//!
//! Connects to a prediction daemon listening on a plain TCP port. Every call
//! to `get_connection` opens a fresh socket; nothing is pooled or retried.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::connection::{ConnectionFactory, DuplexConnection};

/// Default port of a Vowpal Wabbit daemon.
pub const DEFAULT_PORT: u16 = 26542;

/// # TCP Connection Factory
///
/// ```rust,ignore
/// let factory = TcpConnectionFactory::new("localhost", 26542)
///     .with_connect_timeout(Duration::from_secs(5))
///     .with_nodelay(true);
/// ```
#[derive(Debug, Clone)]
pub struct TcpConnectionFactory {
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    nodelay: bool,
}

impl TcpConnectionFactory {
    /// Creates a factory for `host:port`. Does not connect.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: None,
            read_timeout: None,
            nodelay: false,
        }
    }

    /// Bounds how long each address is tried for.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the socket read timeout. An expired read surfaces as a prediction fetch fault.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Enables or disables `TCP_NODELAY`.
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// The `host:port` this factory connects to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn connect(&self) -> io::Result<TcpStream> {
        let addrs = (self.host.as_str(), self.port).to_socket_addrs()?;

        let mut last_err = None;
        for addr in addrs {
            let attempt = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    log::debug!("Connection attempt to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} did not resolve to any address", self.address()),
            )
        }))
    }
}

impl ConnectionFactory for TcpConnectionFactory {
    fn get_connection(&self) -> io::Result<Box<dyn DuplexConnection>> {
        let stream = self.connect()?;
        stream.set_read_timeout(self.read_timeout)?;
        stream.set_nodelay(self.nodelay)?;
        log::info!("Connected to prediction daemon at {}", self.address());
        Ok(Box::new(stream))
    }
}
