use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use oscprims_codec::{MessageView, OscMessage};
use tracing::{debug, info, warn};

use crate::config::SocketConfig;
use crate::error::{Result, TransportError};
use crate::registry::{SocketLease, SocketRegistry};

/// A bound UDP socket that sends to one destination and receives from anyone.
pub struct OscSocket {
    socket: UdpSocket,
    destination: SocketAddr,
    config: SocketConfig,
    recv_buf: Vec<u8>,
    _lease: SocketLease,
}

impl OscSocket {
    /// Resolve the destination, bind the local socket and register it.
    pub fn open(config: SocketConfig, registry: &SocketRegistry) -> Result<Self> {
        config.validate()?;
        let destination = config.resolve_destination()?;
        let local = config.local_addr();

        let socket = UdpSocket::bind(local).map_err(|source| TransportError::Bind {
            addr: local,
            source,
        })?;
        socket.set_read_timeout(config.read_timeout)?;
        socket.set_write_timeout(config.write_timeout)?;

        info!(local = ?socket.local_addr().ok(), %destination, "opened osc socket");

        Ok(Self {
            socket,
            destination,
            recv_buf: vec![0u8; config.recv_buffer_size],
            config,
            _lease: registry.acquire(),
        })
    }

    /// Finalize `message` and send it to the destination.
    pub fn send(&self, message: &mut OscMessage) -> Result<usize> {
        let wire = message.finalize();
        self.send_bytes(&wire)
    }

    /// Send an already-encoded buffer. Empty buffers are skipped.
    pub fn send_bytes(&self, data: &[u8]) -> Result<usize> {
        self.send_bytes_to(data, self.destination)
    }

    /// Finalize `message` and send it to `target` instead of the destination,
    /// e.g. to reply to a sender.
    pub fn send_to(&self, message: &mut OscMessage, target: SocketAddr) -> Result<usize> {
        let wire = message.finalize();
        self.send_bytes_to(&wire, target)
    }

    fn send_bytes_to(&self, data: &[u8], target: SocketAddr) -> Result<usize> {
        if data.is_empty() {
            debug!("skipping empty datagram");
            return Ok(0);
        }
        let sent = self.socket.send_to(data, target)?;
        debug!(len = sent, destination = %target, "sent datagram");
        Ok(sent)
    }

    /// Receive one datagram and parse it.
    pub fn receive(&mut self) -> Result<MessageView> {
        self.receive_from().map(|(message, _)| message)
    }

    /// Receive one datagram, parse it, and report who sent it.
    pub fn receive_from(&mut self) -> Result<(MessageView, SocketAddr)> {
        let (len, from) = match self.socket.recv_from(&mut self.recv_buf) {
            Ok(received) => received,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(TransportError::Timeout(
                    self.config.read_timeout.unwrap_or_default(),
                ));
            }
            Err(err) => return Err(TransportError::Io(err)),
        };

        if len == self.recv_buf.len() {
            warn!(
                len,
                %from,
                "datagram filled the receive buffer and may be cut off"
            );
        }
        debug!(len, %from, "received datagram");

        let message = MessageView::parse(&self.recv_buf[..len])?;
        Ok((message, from))
    }

    /// Close the socket and release its registry lease.
    pub fn close(self) {
        debug!(destination = %self.destination, "closing osc socket");
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Current socket configuration.
    pub fn config(&self) -> &SocketConfig {
        &self.config
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "udp"
    }
}

impl std::fmt::Debug for OscSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OscSocket")
            .field("local", &self.socket.local_addr().ok())
            .field("destination", &self.destination)
            .finish()
    }
}
