use bytes::Bytes;
use tracing::debug;

use crate::byteorder::NetworkOrder;
use crate::error::{CodecError, Result};
use crate::message::validate_address;
use crate::types::{align_up, aligned_len, OscArg, TypeTag};

/// Read-only view over a received OSC message.
///
/// Construction reads the address and type-tag string; argument offsets are
/// resolved on every access by walking the type tags from the first argument.
/// The whole buffer is kept, header included, so offsets are absolute.
#[derive(Debug, Clone)]
pub struct MessageView {
    address: String,
    type_tags: String,
    data: Bytes,
    blob_lengths: Vec<usize>,
}

impl MessageView {
    /// Parse a received buffer, copying it.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        Self::from_bytes(Bytes::copy_from_slice(buf))
    }

    /// Parse a received buffer without copying it.
    pub fn from_bytes(data: Bytes) -> Result<Self> {
        match read_header(&data) {
            Ok((address, type_tags)) => Ok(Self {
                address,
                type_tags,
                data,
                blob_lengths: Vec::new(),
            }),
            Err(err) => {
                debug!(len = data.len(), error = %err, "rejected malformed message");
                Err(err)
            }
        }
    }

    /// Supply the byte length of every blob argument, in argument order.
    ///
    /// Blobs carry no length on the wire, so arguments after a blob can only
    /// be located once these are known.
    pub fn with_blob_lengths(mut self, lengths: impl Into<Vec<usize>>) -> Self {
        self.blob_lengths = lengths.into();
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Type-tag string, including the leading `,`.
    pub fn type_tags(&self) -> &str {
        &self.type_tags
    }

    /// Number of arguments declared by the type tags.
    pub fn arg_count(&self) -> usize {
        self.type_tags.len() - 1
    }

    /// The stored buffer, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Type of the argument at `index`.
    pub fn tag_at(&self, index: usize) -> Result<TypeTag> {
        let count = self.arg_count();
        if index >= count {
            return Err(CodecError::ArgumentOutOfRange { index, count });
        }
        let tag = char::from(self.type_tags.as_bytes()[index + 1]);
        TypeTag::from_char(tag).ok_or(CodecError::UnsupportedType { tag })
    }

    /// Offset of the first argument byte.
    ///
    /// Scans for the `,` after the address, then for the type-tag terminator,
    /// then rounds up to the next 4-byte boundary.
    pub fn data_start_point(&self) -> Result<usize> {
        let start = aligned_len(self.address.len());
        let comma = self.find_byte(start, b',')?;
        let nul = self.find_byte(comma, 0)?;
        Ok(align_up(nul + 1))
    }

    /// Offset of the argument at `index`.
    pub fn argument_start_point(&self, index: usize) -> Result<usize> {
        let count = self.arg_count();
        if index >= count {
            return Err(CodecError::ArgumentOutOfRange { index, count });
        }

        let mut offset = self.data_start_point()?;
        let mut blobs_seen = 0usize;
        for (i, tag) in self.type_tags.chars().skip(1).take(index).enumerate() {
            let tag = TypeTag::from_char(tag).ok_or(CodecError::UnsupportedType { tag })?;
            offset = match tag {
                TypeTag::String => self.string_end(offset)?,
                TypeTag::Blob => {
                    let len = *self
                        .blob_lengths
                        .get(blobs_seen)
                        .ok_or(CodecError::UnknownBlobLength { index: i })?;
                    blobs_seen += 1;
                    self.checked_advance(offset, len)?
                }
                fixed => {
                    let width = fixed.fixed_width().unwrap_or_default();
                    self.checked_advance(offset, width)?
                }
            };
        }
        Ok(offset)
    }

    /// End of the padded string segment starting at `start`.
    pub fn string_end(&self, start: usize) -> Result<usize> {
        let nul = self.find_byte(start, 0)?;
        let end = align_up(nul + 1);
        if end > self.data.len() {
            return Err(self.truncated(start, end - start));
        }
        Ok(end)
    }

    /// Read an `i` argument.
    pub fn get_int(&self, index: usize) -> Result<i32> {
        self.expect_tag(index, TypeTag::Int32)?;
        self.read_fixed(self.argument_start_point(index)?)
    }

    /// Read an `h` argument.
    pub fn get_long(&self, index: usize) -> Result<i64> {
        self.expect_tag(index, TypeTag::Int64)?;
        self.read_fixed(self.argument_start_point(index)?)
    }

    /// Read an `f` argument. An `I` slot reads as positive infinity.
    pub fn get_float(&self, index: usize) -> Result<f32> {
        match self.tag_at(index)? {
            TypeTag::Infinitum => Ok(f32::INFINITY),
            TypeTag::Float32 => self.read_fixed(self.argument_start_point(index)?),
            found => Err(CodecError::TypeMismatch {
                index,
                expected: TypeTag::Float32,
                found,
            }),
        }
    }

    /// Read a `d` argument. An `I` slot reads as positive infinity.
    pub fn get_double(&self, index: usize) -> Result<f64> {
        match self.tag_at(index)? {
            TypeTag::Infinitum => Ok(f64::INFINITY),
            TypeTag::Float64 => self.read_fixed(self.argument_start_point(index)?),
            found => Err(CodecError::TypeMismatch {
                index,
                expected: TypeTag::Float64,
                found,
            }),
        }
    }

    /// Read an `s` argument. Invalid UTF-8 is replaced with U+FFFD.
    pub fn get_string(&self, index: usize) -> Result<String> {
        self.expect_tag(index, TypeTag::String)?;
        let start = self.argument_start_point(index)?;
        let nul = self.find_byte(start, 0)?;
        Ok(String::from_utf8_lossy(&self.data[start..nul]).into_owned())
    }

    /// Read a `T` or `F` argument.
    pub fn get_bool(&self, index: usize) -> Result<bool> {
        match self.tag_at(index)? {
            TypeTag::True => Ok(true),
            TypeTag::False => Ok(false),
            found => Err(CodecError::TypeMismatch {
                index,
                expected: TypeTag::True,
                found,
            }),
        }
    }

    /// Read a `b` argument without copying.
    ///
    /// Uses the supplied blob lengths; a trailing blob with no known length
    /// extends to the end of the buffer.
    pub fn get_blob(&self, index: usize) -> Result<Bytes> {
        self.expect_tag(index, TypeTag::Blob)?;
        let start = self.argument_start_point(index)?;
        let blob_ordinal = self.type_tags[1..index + 2]
            .bytes()
            .filter(|&b| b == b'b')
            .count()
            - 1;

        let len = match self.blob_lengths.get(blob_ordinal) {
            Some(&len) => len,
            None if index + 1 == self.arg_count() => self.data.len() - start,
            None => return Err(CodecError::UnknownBlobLength { index }),
        };
        let end = self.checked_advance(start, len)?;
        Ok(self.data.slice(start..end))
    }

    /// Whether the argument at `index` is the `I` infinity marker.
    pub fn is_infinity(&self, index: usize) -> Result<bool> {
        Ok(self.tag_at(index)? == TypeTag::Infinitum)
    }

    /// Decode the argument at `index`, whatever its type.
    pub fn argument(&self, index: usize) -> Result<OscArg> {
        Ok(match self.tag_at(index)? {
            TypeTag::Int32 => OscArg::Int32(self.get_int(index)?),
            TypeTag::Int64 => OscArg::Int64(self.get_long(index)?),
            TypeTag::Float32 => OscArg::Float32(self.get_float(index)?),
            TypeTag::Float64 => OscArg::Float64(self.get_double(index)?),
            TypeTag::String => OscArg::String(self.get_string(index)?),
            TypeTag::Blob => OscArg::Blob(self.get_blob(index)?),
            TypeTag::True => OscArg::Bool(true),
            TypeTag::False => OscArg::Bool(false),
            TypeTag::Infinitum => OscArg::Infinitum,
        })
    }

    /// Decode every argument in order.
    pub fn arguments(&self) -> Result<Vec<OscArg>> {
        (0..self.arg_count()).map(|i| self.argument(i)).collect()
    }

    fn expect_tag(&self, index: usize, expected: TypeTag) -> Result<()> {
        let found = self.tag_at(index)?;
        if found != expected {
            return Err(CodecError::TypeMismatch {
                index,
                expected,
                found,
            });
        }
        Ok(())
    }

    fn read_fixed<T: NetworkOrder>(&self, offset: usize) -> Result<T> {
        let end = self.checked_advance(offset, T::WIDTH)?;
        let bytes = <T::Bytes>::try_from(&self.data[offset..end])
            .map_err(|_| self.truncated(offset, T::WIDTH))?;
        Ok(T::from_network_bytes(bytes))
    }

    fn checked_advance(&self, offset: usize, width: usize) -> Result<usize> {
        match offset.checked_add(width) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(self.truncated(offset, width)),
        }
    }

    fn find_byte(&self, start: usize, needle: u8) -> Result<usize> {
        self.data
            .get(start..)
            .and_then(|rest| rest.iter().position(|&b| b == needle))
            .map(|pos| start + pos)
            .ok_or_else(|| self.truncated(start, 1))
    }

    fn truncated(&self, offset: usize, needed: usize) -> CodecError {
        CodecError::TruncatedMessage {
            offset,
            needed,
            len: self.data.len(),
        }
    }
}

/// Read the address and type-tag string from the start of `data`.
fn read_header(data: &[u8]) -> Result<(String, String)> {
    let truncated = |offset: usize| CodecError::TruncatedMessage {
        offset,
        needed: 1,
        len: data.len(),
    };

    let address_end = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| truncated(data.len()))?;
    let address = std::str::from_utf8(&data[..address_end]).map_err(|_| {
        CodecError::InvalidAddress {
            address: String::from_utf8_lossy(&data[..address_end]).into_owned(),
        }
    })?;
    validate_address(address)?;

    let search_from = aligned_len(address_end);
    let tags_start = data
        .get(search_from..)
        .and_then(|rest| rest.iter().position(|&b| b != 0))
        .map(|pos| search_from + pos)
        .ok_or_else(|| truncated(search_from))?;
    if data[tags_start] != b',' {
        return Err(CodecError::UnsupportedType {
            tag: char::from(data[tags_start]),
        });
    }

    let tags_end = data[tags_start..]
        .iter()
        .position(|&b| b == 0)
        .map(|pos| tags_start + pos)
        .ok_or_else(|| truncated(data.len()))?;
    // Tags are single ASCII bytes; anything else cannot be indexed by position.
    if let Some(&b) = data[tags_start..tags_end].iter().find(|b| !b.is_ascii()) {
        return Err(CodecError::UnsupportedType {
            tag: char::from(b),
        });
    }
    let type_tags = data[tags_start..tags_end].iter().map(|&b| char::from(b)).collect();

    Ok((address.to_owned(), type_tags))
}
