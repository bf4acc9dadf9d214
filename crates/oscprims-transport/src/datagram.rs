//! Async UDP transport (requires the `async` feature).

use std::net::SocketAddr;

use bytes::BytesMut;
use oscprims_codec::{MessageView, OscMessage};
use tokio::net::UdpSocket;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, info};

use crate::config::SocketConfig;
use crate::error::{Result, TransportError};
use crate::registry::{SocketLease, SocketRegistry};

/// Datagram codec: one UDP payload is exactly one OSC message.
#[derive(Debug, Clone, Copy, Default)]
pub struct OscDatagramCodec;

impl Decoder for OscDatagramCodec {
    type Item = MessageView;
    type Error = TransportError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<MessageView>> {
        if src.is_empty() {
            return Ok(None);
        }
        let datagram = src.split().freeze();
        Ok(Some(MessageView::from_bytes(datagram)?))
    }
}

impl Encoder<OscMessage> for OscDatagramCodec {
    type Error = TransportError;

    fn encode(&mut self, mut item: OscMessage, dst: &mut BytesMut) -> Result<()> {
        let wire = item.finalize();
        dst.reserve(wire.len());
        dst.extend_from_slice(&wire);
        Ok(())
    }
}

/// Async counterpart of [`OscSocket`](crate::OscSocket) on `tokio::net::UdpSocket`.
pub struct AsyncOscSocket {
    socket: UdpSocket,
    destination: SocketAddr,
    config: SocketConfig,
    codec: OscDatagramCodec,
    buf: BytesMut,
    _lease: SocketLease,
}

impl AsyncOscSocket {
    /// Resolve the destination, bind the local socket and register it.
    pub async fn open(config: SocketConfig, registry: &SocketRegistry) -> Result<Self> {
        config.validate()?;
        let candidates = tokio::net::lookup_host(config.destination.as_str())
            .await
            .map_err(|source| TransportError::Resolve {
                destination: config.destination.clone(),
                source,
            })?;
        let destination = config.pick_destination(candidates)?;

        let local = config.local_addr();
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|source| TransportError::Bind {
                addr: local,
                source,
            })?;

        info!(local = ?socket.local_addr().ok(), %destination, "opened async osc socket");

        Ok(Self {
            socket,
            destination,
            buf: BytesMut::with_capacity(config.recv_buffer_size),
            config,
            codec: OscDatagramCodec,
            _lease: registry.acquire(),
        })
    }

    /// Finalize `message` and send it to the destination.
    pub async fn send(&mut self, message: OscMessage) -> Result<usize> {
        self.buf.clear();
        self.codec.encode(message, &mut self.buf)?;
        let sent = self.socket.send_to(&self.buf, self.destination).await?;
        debug!(len = sent, destination = %self.destination, "sent datagram");
        Ok(sent)
    }

    /// Receive one message, honouring the configured read timeout.
    pub async fn receive(&mut self) -> Result<MessageView> {
        self.receive_from().await.map(|(message, _)| message)
    }

    /// Receive one message and report who sent it.
    ///
    /// Empty datagrams are skipped.
    pub async fn receive_from(&mut self) -> Result<(MessageView, SocketAddr)> {
        match self.config.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.recv_next())
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => self.recv_next().await,
        }
    }

    async fn recv_next(&mut self) -> Result<(MessageView, SocketAddr)> {
        loop {
            self.buf.clear();
            self.buf.resize(self.config.recv_buffer_size, 0);
            let (len, from) = self.socket.recv_from(&mut self.buf).await?;
            self.buf.truncate(len);
            debug!(len, %from, "received datagram");

            if let Some(message) = self.codec.decode(&mut self.buf)? {
                return Ok((message, from));
            }
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

impl std::fmt::Debug for AsyncOscSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncOscSocket")
            .field("local", &self.socket.local_addr().ok())
            .field("destination", &self.destination)
            .finish()
    }
}
