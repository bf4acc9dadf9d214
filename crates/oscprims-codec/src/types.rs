use bytes::Bytes;

/// OSC segments (address, type tags, strings) end on this boundary.
pub const ALIGNMENT: usize = 4;

/// Padded length of a NUL-terminated segment holding `raw_len` bytes.
///
/// Returns the smallest multiple of [`ALIGNMENT`] strictly greater than
/// `raw_len`, so at least one terminator byte is always present.
pub const fn aligned_len(raw_len: usize) -> usize {
    (raw_len / ALIGNMENT + 1) * ALIGNMENT
}

/// Round `offset` up to the next multiple of [`ALIGNMENT`].
pub(crate) const fn align_up(offset: usize) -> usize {
    offset.div_ceil(ALIGNMENT) * ALIGNMENT
}

/// Wire type of one argument, as written in the type-tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `i`: 32-bit big-endian two's complement integer.
    Int32,
    /// `h`: 64-bit big-endian two's complement integer.
    Int64,
    /// `f`: 32-bit big-endian IEEE 754 float.
    Float32,
    /// `d`: 64-bit big-endian IEEE 754 float.
    Float64,
    /// `s`: NUL-terminated string padded to 4 bytes.
    String,
    /// `b`: raw bytes with no length prefix.
    Blob,
    /// `T`: boolean true, no payload.
    True,
    /// `F`: boolean false, no payload.
    False,
    /// `I`: infinity marker, no payload.
    Infinitum,
}

impl TypeTag {
    /// Parse a type-tag character.
    pub fn from_char(tag: char) -> Option<Self> {
        match tag {
            'i' => Some(Self::Int32),
            'h' => Some(Self::Int64),
            'f' => Some(Self::Float32),
            'd' => Some(Self::Float64),
            's' => Some(Self::String),
            'b' => Some(Self::Blob),
            'T' => Some(Self::True),
            'F' => Some(Self::False),
            'I' => Some(Self::Infinitum),
            _ => None,
        }
    }

    /// The character written into the type-tag string.
    pub const fn as_char(self) -> char {
        match self {
            Self::Int32 => 'i',
            Self::Int64 => 'h',
            Self::Float32 => 'f',
            Self::Float64 => 'd',
            Self::String => 's',
            Self::Blob => 'b',
            Self::True => 'T',
            Self::False => 'F',
            Self::Infinitum => 'I',
        }
    }

    /// Payload width for fixed-size types. `None` for strings and blobs.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Int32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Float64 => Some(8),
            Self::True | Self::False | Self::Infinitum => Some(0),
            Self::String | Self::Blob => None,
        }
    }

    /// Human-readable type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Blob => "blob",
            Self::True | Self::False => "bool",
            Self::Infinitum => "infinitum",
        }
    }
}

/// A single decoded (or to-be-encoded) argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Blob(Bytes),
    Bool(bool),
    /// Infinity of unspecified width and sign.
    Infinitum,
}

impl OscArg {
    /// The tag this value is written with.
    ///
    /// Infinite floats report [`TypeTag::Infinitum`], matching what the
    /// encoder puts on the wire.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Int32(_) => TypeTag::Int32,
            Self::Int64(_) => TypeTag::Int64,
            Self::Float32(v) if v.is_infinite() => TypeTag::Infinitum,
            Self::Float32(_) => TypeTag::Float32,
            Self::Float64(v) if v.is_infinite() => TypeTag::Infinitum,
            Self::Float64(_) => TypeTag::Float64,
            Self::String(_) => TypeTag::String,
            Self::Blob(_) => TypeTag::Blob,
            Self::Bool(true) => TypeTag::True,
            Self::Bool(false) => TypeTag::False,
            Self::Infinitum => TypeTag::Infinitum,
        }
    }
}

impl From<i32> for OscArg {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for OscArg {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f32> for OscArg {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for OscArg {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<bool> for OscArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for OscArg {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for OscArg {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&[u8]> for OscArg {
    fn from(value: &[u8]) -> Self {
        Self::Blob(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for OscArg {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(Bytes::from(value))
    }
}

impl From<Bytes> for OscArg {
    fn from(value: Bytes) -> Self {
        Self::Blob(value)
    }
}
