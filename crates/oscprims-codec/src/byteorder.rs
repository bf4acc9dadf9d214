//! Host ↔ network byte-order normalization.
//!
//! OSC puts every multi-byte numeric on the wire big-endian. The host order is
//! fixed at compile time, so on big-endian targets every conversion here is a
//! no-op and on little-endian targets it is a single byte swap.

/// True when the target stores multi-byte values least-significant byte first.
pub const HOST_IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// Convert a 32-bit host value to network order.
#[inline]
pub const fn hton32(value: u32) -> u32 {
    if HOST_IS_LITTLE_ENDIAN {
        value.swap_bytes()
    } else {
        value
    }
}

/// Convert a 32-bit network value to host order.
#[inline]
pub const fn ntoh32(value: u32) -> u32 {
    hton32(value)
}

/// Convert a 64-bit host value to network order.
#[inline]
pub const fn hton64(value: u64) -> u64 {
    if HOST_IS_LITTLE_ENDIAN {
        value.swap_bytes()
    } else {
        value
    }
}

/// Convert a 64-bit network value to host order.
#[inline]
pub const fn ntoh64(value: u64) -> u64 {
    hton64(value)
}

/// Fixed-width numerics that travel in network byte order.
pub trait NetworkOrder: Sized + Copy {
    /// Wire width in bytes.
    const WIDTH: usize;
    /// The byte array holding one encoded value.
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Encode `self` as network-order bytes.
    fn to_network_bytes(self) -> Self::Bytes;

    /// Decode a value from network-order bytes.
    fn from_network_bytes(bytes: Self::Bytes) -> Self;
}

impl NetworkOrder for i32 {
    const WIDTH: usize = 4;
    type Bytes = [u8; 4];

    fn to_network_bytes(self) -> [u8; 4] {
        hton32(self as u32).to_ne_bytes()
    }

    fn from_network_bytes(bytes: [u8; 4]) -> Self {
        ntoh32(u32::from_ne_bytes(bytes)) as i32
    }
}

impl NetworkOrder for i64 {
    const WIDTH: usize = 8;
    type Bytes = [u8; 8];

    fn to_network_bytes(self) -> [u8; 8] {
        hton64(self as u64).to_ne_bytes()
    }

    fn from_network_bytes(bytes: [u8; 8]) -> Self {
        ntoh64(u64::from_ne_bytes(bytes)) as i64
    }
}

impl NetworkOrder for f32 {
    const WIDTH: usize = 4;
    type Bytes = [u8; 4];

    fn to_network_bytes(self) -> [u8; 4] {
        hton32(self.to_bits()).to_ne_bytes()
    }

    fn from_network_bytes(bytes: [u8; 4]) -> Self {
        f32::from_bits(ntoh32(u32::from_ne_bytes(bytes)))
    }
}

impl NetworkOrder for f64 {
    const WIDTH: usize = 8;
    type Bytes = [u8; 8];

    fn to_network_bytes(self) -> [u8; 8] {
        hton64(self.to_bits()).to_ne_bytes()
    }

    fn from_network_bytes(bytes: [u8; 8]) -> Self {
        f64::from_bits(ntoh64(u64::from_ne_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int32_is_big_endian_on_the_wire() {
        assert_eq!(42i32.to_network_bytes(), [0, 0, 0, 42]);
        assert_eq!((-1i32).to_network_bytes(), [0xFF; 4]);
        assert_eq!(i32::from_network_bytes([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
    }

    #[test]
    fn int64_is_big_endian_on_the_wire() {
        assert_eq!(
            0x0102_0304_0506_0708i64.to_network_bytes(),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn floats_keep_exact_bits() {
        assert_eq!(1.0f32.to_network_bytes(), [0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(
            1.0f64.to_network_bytes(),
            [0x3F, 0xF0, 0, 0, 0, 0, 0, 0]
        );

        let nan = f32::from_bits(0x7FC0_0001);
        let back = f32::from_network_bytes(nan.to_network_bytes());
        assert_eq!(back.to_bits(), nan.to_bits());
    }

    #[test]
    fn swap_matches_host_order() {
        assert_eq!(hton32(0x1122_3344).to_ne_bytes(), [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(ntoh64(hton64(0xDEAD_BEEF_0000_0001)), 0xDEAD_BEEF_0000_0001);
    }
}
