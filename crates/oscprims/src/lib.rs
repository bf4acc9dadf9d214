//! Byte-exact Open Sound Control messages over UDP.
//!
//! oscprims builds OSC messages with exact wire layout, reads arguments out of
//! received buffers by index, and moves the bytes over UDP.
//!
//! # Crate Structure
//!
//! - [`codec`]: message encoder, decoder and byte-order helpers
//! - [`transport`]: UDP sockets and the open-socket registry (async socket behind `async`)

/// Re-export codec types.
pub mod codec {
    pub use oscprims_codec::*;
}

/// Re-export transport types.
pub mod transport {
    pub use oscprims_transport::*;
}
