use std::net::SocketAddr;
use std::time::Duration;

use oscprims_codec::CodecError;

/// Errors that can occur in OSC transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The destination could not be resolved.
    #[error("failed to resolve {destination}: {source}")]
    Resolve {
        destination: String,
        source: std::io::Error,
    },

    /// The destination resolved, but not to an address the local socket can reach.
    #[error("no {family} address found for {destination}")]
    NoAddress {
        destination: String,
        family: &'static str,
    },

    /// The socket configuration cannot work, e.g. a zero-byte receive buffer.
    #[error("invalid socket configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind the local socket.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// An I/O error occurred on the socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No datagram arrived within the read timeout.
    #[error("receive timed out after {0:?}")]
    Timeout(Duration),

    /// A datagram arrived but is not a valid OSC message.
    #[error("malformed message: {0}")]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, TransportError>;
