use std::ffi::CStr;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::byteorder::NetworkOrder;
use crate::error::{CodecError, Result};
use crate::types::{aligned_len, OscArg, TypeTag};
use crate::MIN_PACKET_BYTES;

/// An outgoing OSC message in its build phase.
///
/// Arguments are appended one at a time; every push returns `&mut Self` so
/// calls chain with `?`. [`finalize`](Self::finalize) freezes the message into
/// its wire buffer, after which pushes fail with [`CodecError::MessageClosed`].
///
/// ```
/// use oscprims_codec::OscMessage;
///
/// let mut msg = OscMessage::new("/foo")?;
/// msg.push_int32(42)?.push_str("hi")?.push_bool(true)?;
/// assert_eq!(msg.type_tags(), ",isT");
///
/// let wire = msg.finalize();
/// assert_eq!(wire.len(), 24);
/// # Ok::<(), oscprims_codec::CodecError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OscMessage {
    address: String,
    type_tags: String,
    payload: BytesMut,
    blob_lengths: Vec<usize>,
    wire: Option<Bytes>,
}

impl OscMessage {
    /// Start a message for `address`.
    ///
    /// The address must start with `/`, hold at least one more character and
    /// contain no NUL byte.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        validate_address(&address)?;

        Ok(Self {
            address,
            type_tags: String::from(","),
            payload: BytesMut::with_capacity(MIN_PACKET_BYTES),
            blob_lengths: Vec::new(),
            wire: None,
        })
    }

    /// Append a 32-bit integer (`i`).
    pub fn push_int32(&mut self, value: i32) -> Result<&mut Self> {
        self.ensure_open()?;
        self.payload.put_slice(&value.to_network_bytes());
        self.type_tags.push(TypeTag::Int32.as_char());
        Ok(self)
    }

    /// Append a 64-bit integer (`h`).
    pub fn push_int64(&mut self, value: i64) -> Result<&mut Self> {
        self.ensure_open()?;
        self.payload.put_slice(&value.to_network_bytes());
        self.type_tags.push(TypeTag::Int64.as_char());
        Ok(self)
    }

    /// Append a 32-bit float (`f`), or a bare `I` tag if `value` is infinite.
    pub fn push_float32(&mut self, value: f32) -> Result<&mut Self> {
        self.ensure_open()?;
        if value.is_infinite() {
            self.type_tags.push(TypeTag::Infinitum.as_char());
        } else {
            self.payload.put_slice(&value.to_network_bytes());
            self.type_tags.push(TypeTag::Float32.as_char());
        }
        Ok(self)
    }

    /// Append a 64-bit float (`d`), or a bare `I` tag if `value` is infinite.
    pub fn push_float64(&mut self, value: f64) -> Result<&mut Self> {
        self.ensure_open()?;
        if value.is_infinite() {
            self.type_tags.push(TypeTag::Infinitum.as_char());
        } else {
            self.payload.put_slice(&value.to_network_bytes());
            self.type_tags.push(TypeTag::Float64.as_char());
        }
        Ok(self)
    }

    /// Append a boolean as a `T` or `F` tag. No payload bytes are written.
    pub fn push_bool(&mut self, value: bool) -> Result<&mut Self> {
        self.ensure_open()?;
        let tag = if value { TypeTag::True } else { TypeTag::False };
        self.type_tags.push(tag.as_char());
        Ok(self)
    }

    /// Append a string (`s`).
    pub fn push_str(&mut self, value: &str) -> Result<&mut Self> {
        self.push_string_bytes(value.as_bytes())
    }

    /// Append a C string (`s`). The terminator is re-added by the padding.
    pub fn push_cstr(&mut self, value: &CStr) -> Result<&mut Self> {
        self.push_string_bytes(value.to_bytes())
    }

    /// Append a wide (UTF-16) string (`s`), transcoded to UTF-8.
    ///
    /// Unpaired surrogates are replaced with U+FFFD.
    pub fn push_wide_str(&mut self, units: &[u16]) -> Result<&mut Self> {
        let narrowed = String::from_utf16_lossy(units);
        self.push_string_bytes(narrowed.as_bytes())
    }

    /// Append raw bytes as a blob (`b`).
    ///
    /// No length prefix and no padding are written; the length is kept in
    /// [`blob_lengths`](Self::blob_lengths) for readers that need to skip it.
    pub fn push_blob(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.ensure_open()?;
        self.payload.put_slice(data);
        self.blob_lengths.push(data.len());
        self.type_tags.push(TypeTag::Blob.as_char());
        Ok(self)
    }

    /// Append any value convertible to an [`OscArg`].
    pub fn push(&mut self, value: impl Into<OscArg>) -> Result<&mut Self> {
        self.push_arg(value.into())
    }

    /// Append an already-typed argument.
    pub fn push_arg(&mut self, arg: OscArg) -> Result<&mut Self> {
        match arg {
            OscArg::Int32(v) => self.push_int32(v),
            OscArg::Int64(v) => self.push_int64(v),
            OscArg::Float32(v) => self.push_float32(v),
            OscArg::Float64(v) => self.push_float64(v),
            OscArg::String(v) => self.push_str(&v),
            OscArg::Blob(v) => self.push_blob(&v),
            OscArg::Bool(v) => self.push_bool(v),
            OscArg::Infinitum => self.push_float32(f32::INFINITY),
        }
    }

    /// Freeze the message and return its wire buffer.
    ///
    /// The first call assembles address, type tags and payload; later calls
    /// return the same buffer without rebuilding it.
    pub fn finalize(&mut self) -> Bytes {
        if let Some(wire) = &self.wire {
            return wire.clone();
        }

        let mut buf = BytesMut::with_capacity(self.wire_len());
        put_padded(&mut buf, self.address.as_bytes());
        put_padded(&mut buf, self.type_tags.as_bytes());
        buf.put_slice(&self.payload);

        let wire = buf.freeze();
        debug!(
            address = %self.address,
            type_tags = %self.type_tags,
            len = wire.len(),
            "finalized message"
        );
        self.wire = Some(wire.clone());
        wire
    }

    /// Length of the wire buffer [`finalize`](Self::finalize) produces.
    pub fn wire_len(&self) -> usize {
        aligned_len(self.address.len()) + aligned_len(self.type_tags.len()) + self.payload.len()
    }

    /// Whether the message has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.wire.is_some()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Type-tag string, including the leading `,`.
    pub fn type_tags(&self) -> &str {
        &self.type_tags
    }

    /// Encoded argument bytes, without the header.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of arguments pushed so far.
    pub fn arg_count(&self) -> usize {
        self.type_tags.len() - 1
    }

    /// Byte length of every blob argument, in push order.
    pub fn blob_lengths(&self) -> &[usize] {
        &self.blob_lengths
    }

    fn push_string_bytes(&mut self, raw: &[u8]) -> Result<&mut Self> {
        self.ensure_open()?;
        if let Some(position) = raw.iter().position(|&b| b == 0) {
            return Err(CodecError::InteriorNul { position });
        }
        put_padded(&mut self.payload, raw);
        self.type_tags.push(TypeTag::String.as_char());
        Ok(self)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_finalized() {
            trace!(address = %self.address, "push rejected on finalized message");
            return Err(CodecError::MessageClosed);
        }
        Ok(())
    }
}

/// Write `raw` followed by zero bytes up to its aligned length.
fn put_padded(dst: &mut BytesMut, raw: &[u8]) {
    let padding = aligned_len(raw.len()) - raw.len();
    dst.reserve(raw.len() + padding);
    dst.put_slice(raw);
    dst.put_bytes(0, padding);
}

pub(crate) fn validate_address(address: &str) -> Result<()> {
    if address.len() <= 1 || !address.starts_with('/') {
        return Err(CodecError::InvalidAddress {
            address: address.to_owned(),
        });
    }
    if let Some(position) = address.bytes().position(|b| b == 0) {
        return Err(CodecError::InteriorNul { position });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_addresses() {
        for address in ["", "/", "foo", "foo/bar"] {
            let err = OscMessage::new(address).unwrap_err();
            assert!(
                matches!(err, CodecError::InvalidAddress { .. }),
                "{address:?} should be rejected, got {err:?}"
            );
        }
        assert!(matches!(
            OscMessage::new("/a\0b"),
            Err(CodecError::InteriorNul { position: 2 })
        ));
    }

    #[test]
    fn empty_message_layout() {
        let mut msg = OscMessage::new("/ping").unwrap();
        let wire = msg.finalize();
        assert_eq!(wire.as_ref(), b"/ping\0\0\0,\0\0\0");
    }

    #[test]
    fn mixed_message_layout() {
        let mut msg = OscMessage::new("/foo").unwrap();
        msg.push_int32(42).unwrap().push_str("hi").unwrap().push_bool(true).unwrap();

        let wire = msg.finalize();
        let mut expected = Vec::new();
        expected.extend_from_slice(b"/foo\0\0\0\0");
        expected.extend_from_slice(b",isT\0\0\0\0");
        expected.extend_from_slice(&[0, 0, 0, 42]);
        expected.extend_from_slice(b"hi\0\0");
        assert_eq!(wire.as_ref(), expected.as_slice());
    }

    #[test]
    fn numeric_pushes_write_big_endian() {
        let mut msg = OscMessage::new("/n").unwrap();
        msg.push_int64(1).unwrap().push_float32(1.0).unwrap().push_float64(-2.0).unwrap();

        assert_eq!(msg.type_tags(), ",hfd");
        assert_eq!(
            msg.payload(),
            &[
                0, 0, 0, 0, 0, 0, 0, 1, // h
                0x3F, 0x80, 0, 0, // f
                0xC0, 0, 0, 0, 0, 0, 0, 0, // d
            ]
        );
    }

    #[test]
    fn infinity_writes_tag_only() {
        let mut msg = OscMessage::new("/inf").unwrap();
        msg.push_float32(f32::INFINITY)
            .unwrap()
            .push_float64(f64::NEG_INFINITY)
            .unwrap();

        assert_eq!(msg.type_tags(), ",II");
        assert!(msg.payload().is_empty());
    }

    #[test]
    fn string_padding_always_terminates() {
        let mut msg = OscMessage::new("/s").unwrap();
        msg.push_str("").unwrap();
        assert_eq!(msg.payload(), b"\0\0\0\0");

        let mut msg = OscMessage::new("/s").unwrap();
        msg.push_str("abcd").unwrap();
        assert_eq!(msg.payload(), b"abcd\0\0\0\0");
    }

    #[test]
    fn string_variants_share_layout() {
        let mut a = OscMessage::new("/s").unwrap();
        a.push_str("osc").unwrap();

        let mut b = OscMessage::new("/s").unwrap();
        b.push_cstr(c"osc").unwrap();

        let mut c = OscMessage::new("/s").unwrap();
        let wide: Vec<u16> = "osc".encode_utf16().collect();
        c.push_wide_str(&wide).unwrap();

        assert_eq!(a.finalize(), b.finalize());
        assert_eq!(a.finalize(), c.finalize());
    }

    #[test]
    fn string_with_interior_nul_rejected() {
        let mut msg = OscMessage::new("/s").unwrap();
        let err = msg.push_str("a\0b").unwrap_err();
        assert_eq!(err, CodecError::InteriorNul { position: 1 });
        assert_eq!(msg.type_tags(), ",");
        assert!(msg.payload().is_empty());
    }

    #[test]
    fn blob_is_appended_raw() {
        let mut msg = OscMessage::new("/b").unwrap();
        msg.push_int32(7).unwrap().push_blob(&[1, 2, 3]).unwrap();

        assert_eq!(msg.type_tags(), ",ib");
        assert_eq!(msg.payload(), &[0, 0, 0, 7, 1, 2, 3]);
        assert_eq!(msg.blob_lengths(), &[3]);
    }

    #[test]
    fn generic_push_dispatches_by_type() {
        let mut msg = OscMessage::new("/g").unwrap();
        msg.push(1i32)
            .unwrap()
            .push(2i64)
            .unwrap()
            .push(0.5f32)
            .unwrap()
            .push(0.25f64)
            .unwrap()
            .push("x")
            .unwrap()
            .push(vec![9u8])
            .unwrap()
            .push(false)
            .unwrap()
            .push_arg(OscArg::Infinitum)
            .unwrap();

        assert_eq!(msg.type_tags(), ",ihfdsbFI");
        assert_eq!(msg.arg_count(), 8);
    }

    #[test]
    fn push_after_finalize_fails() {
        let mut msg = OscMessage::new("/closed").unwrap();
        msg.push_int32(1).unwrap();
        let wire = msg.finalize();

        assert_eq!(msg.push_int32(2).unwrap_err(), CodecError::MessageClosed);
        assert_eq!(msg.push_str("x").unwrap_err(), CodecError::MessageClosed);
        assert_eq!(msg.push_bool(true).unwrap_err(), CodecError::MessageClosed);
        assert_eq!(msg.push_blob(b"x").unwrap_err(), CodecError::MessageClosed);
        assert_eq!(
            msg.push_float64(f64::INFINITY).unwrap_err(),
            CodecError::MessageClosed
        );

        assert_eq!(msg.type_tags(), ",i");
        assert_eq!(msg.finalize(), wire);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut msg = OscMessage::new("/twice").unwrap();
        msg.push_str("once").unwrap();

        let first = msg.finalize();
        let second = msg.finalize();
        assert_eq!(first, second);
        assert_eq!(first.len(), msg.wire_len());
        assert!(msg.is_finalized());
    }
}
