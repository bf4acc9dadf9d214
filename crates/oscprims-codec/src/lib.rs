//! Byte-exact Open Sound Control message encoding and decoding.
//!
//! This is the core layer of oscprims. Every message is laid out as:
//! - The address, NUL-terminated and zero-padded to a 4-byte boundary
//! - The `,`-prefixed type-tag string, padded the same way
//! - The argument bytes, big-endian, in push order
//!
//! [`OscMessage`] builds and finalizes outgoing messages, [`MessageView`]
//! resolves arguments of a received buffer by index. No I/O happens here.

pub mod byteorder;
pub mod decoder;
pub mod error;
pub mod message;
pub mod types;

pub use decoder::MessageView;
pub use error::{CodecError, Result};
pub use message::OscMessage;
pub use types::{aligned_len, OscArg, TypeTag, ALIGNMENT};

/// Initial payload capacity reserved for a new message.
pub const MIN_PACKET_BYTES: usize = 64;
