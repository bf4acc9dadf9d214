//! UDP transport for Open Sound Control messages.
//!
//! The transport only moves bytes: it hands finalized [`OscMessage`] buffers
//! to the socket and wraps received datagrams in a [`MessageView`]. Sockets
//! are tracked by an explicit [`SocketRegistry`] instead of global state.
//!
//! [`OscMessage`]: oscprims_codec::OscMessage
//! [`MessageView`]: oscprims_codec::MessageView

pub mod config;
pub mod error;
pub mod registry;
pub mod udp;

#[cfg(feature = "async")]
pub mod datagram;

pub use config::{SocketConfig, DEFAULT_RECV_BUFFER_SIZE};
pub use error::{Result, TransportError};
pub use registry::{SocketLease, SocketRegistry};
pub use udp::OscSocket;

#[cfg(feature = "async")]
pub use datagram::{AsyncOscSocket, OscDatagramCodec};
