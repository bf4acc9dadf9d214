use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::error::{Result, TransportError};

/// Default receive buffer: one datagram of up to 1 KiB.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 1024;

/// Default destination when none is configured.
pub const DEFAULT_DESTINATION: &str = "127.0.0.1:9000";

/// Configuration for an OSC socket.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Where outgoing messages go, as `host:port`.
    pub destination: String,
    /// Local address to bind. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,
    /// Local port to bind; `0` picks an ephemeral port.
    pub local_port: u16,
    /// Size of the fixed receive buffer. Longer datagrams are cut off.
    pub recv_buffer_size: usize,
    /// Read timeout for blocking receives.
    pub read_timeout: Option<Duration>,
    /// Write timeout for blocking sends.
    pub write_timeout: Option<Duration>,
}

impl SocketConfig {
    /// Default configuration sending to `destination`.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    /// The local address the socket binds to.
    pub fn local_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.local_port)
    }

    /// Reject settings no socket could operate with.
    pub fn validate(&self) -> Result<()> {
        if self.recv_buffer_size == 0 {
            return Err(TransportError::InvalidConfig(
                "recv_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the destination to an address of the same family as the bind address.
    pub fn resolve_destination(&self) -> Result<SocketAddr> {
        let candidates =
            self.destination
                .to_socket_addrs()
                .map_err(|source| TransportError::Resolve {
                    destination: self.destination.clone(),
                    source,
                })?;
        self.pick_destination(candidates)
    }

    pub(crate) fn pick_destination(
        &self,
        candidates: impl IntoIterator<Item = SocketAddr>,
    ) -> Result<SocketAddr> {
        let want_v4 = self.bind_addr.is_ipv4();
        candidates
            .into_iter()
            .find(|addr| addr.is_ipv4() == want_v4)
            .ok_or_else(|| TransportError::NoAddress {
                destination: self.destination.clone(),
                family: if want_v4 { "IPv4" } else { "IPv6" },
            })
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            local_port: 0,
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
