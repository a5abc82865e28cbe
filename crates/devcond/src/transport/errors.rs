//! Error types for socket listener and client stream operations.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding the console listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured host could not be resolved.
    #[error("failed to resolve TCP address {host}:{port}: {source}")]
    Resolve {
        /// Host taken from the listen endpoint.
        host: String,
        /// Port taken from the listen endpoint.
        port: u16,
        /// Resolver failure.
        #[source]
        source: io::Error,
    },
    /// Resolution succeeded but produced no addresses.
    #[error("no TCP addresses resolved for {host}:{port}")]
    ResolveEmpty {
        /// Host taken from the listen endpoint.
        host: String,
        /// Port taken from the listen endpoint.
        port: u16,
    },
    /// The socket could not be bound, usually because the port is taken.
    #[error("failed to bind TCP listener at {addr}: {source}")]
    BindTcp {
        /// Address the bind was attempted on.
        addr: SocketAddr,
        /// Operating system error.
        #[source]
        source: io::Error,
    },
    /// The bound socket refused non-blocking mode.
    #[error("failed to enable non-blocking listener: {source}")]
    NonBlocking {
        /// Operating system error.
        #[source]
        source: io::Error,
    },
}

/// Failures reading from or writing to a client stream.
///
/// `WouldBlock` is the ordinary "nothing to do yet" outcome of a
/// non-blocking call. Every other variant means the stream can no longer be
/// trusted and the client is evicted.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No data or connection was ready.
    #[error("operation would block")]
    WouldBlock,
    /// The peer closed its end of the connection.
    #[error("remote peer closed the connection")]
    RemoteClosed,
    /// A frame header announced a body larger than the configured limit.
    #[error("frame of {length} bytes exceeds the {max} byte limit")]
    FrameTooLarge {
        /// Length announced by the header.
        length: u32,
        /// Configured limit.
        max: u32,
    },
    /// An outgoing message does not fit the 32-bit length prefix.
    #[error("message of {length} bytes does not fit a frame")]
    MessageTooLong {
        /// Length of the encoded message.
        length: usize,
    },
    /// Any other socket failure.
    #[error("I/O failure: {source}")]
    Io {
        /// Operating system error.
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    /// Returns `true` for the benign would-block outcome.
    #[must_use]
    pub const fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }
}

impl From<io::Error> for TransportError {
    fn from(source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::WouldBlock => Self::WouldBlock,
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::RemoteClosed,
            _ => Self::Io { source },
        }
    }
}
