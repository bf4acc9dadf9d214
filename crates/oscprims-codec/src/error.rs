use crate::types::TypeTag;

/// Errors that can occur during message encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The address is empty, too short, or does not start with `/`.
    #[error("invalid address {address:?} (expected '/' followed by at least one character)")]
    InvalidAddress { address: String },

    /// A push was attempted after the message was finalized.
    #[error("message already finalized; construct a new message instead")]
    MessageClosed,

    /// A type-tag character has no known wire layout.
    #[error("unsupported type tag {tag:?}")]
    UnsupportedType { tag: char },

    /// Resolving an offset or reading a value would run past the buffer end.
    #[error("truncated message (needed {needed} bytes at offset {offset}, buffer has {len})")]
    TruncatedMessage {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A string argument or the address contains a NUL byte.
    #[error("string contains an interior NUL byte at position {position}")]
    InteriorNul { position: usize },

    /// The requested argument index does not exist.
    #[error("argument index {index} out of range ({count} arguments)")]
    ArgumentOutOfRange { index: usize, count: usize },

    /// The argument at `index` has a different type than the getter reads.
    #[error("argument {index} is {found:?}, expected {expected:?}")]
    TypeMismatch {
        index: usize,
        expected: TypeTag,
        found: TypeTag,
    },

    /// A blob precedes the requested argument and its length was never supplied.
    #[error("length of blob argument {index} is unknown; supply blob lengths to read past it")]
    UnknownBlobLength { index: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
