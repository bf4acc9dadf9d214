//! Two async sockets on loopback exchanging a ping and a pong.
//!
//! Run with:
//!   cargo run --example async-ping --features async

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use oscprims::codec::OscMessage;
use oscprims::transport::{AsyncOscSocket, SocketConfig, SocketRegistry};

fn loopback(destination: String) -> SocketConfig {
    SocketConfig {
        bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
        read_timeout: Some(Duration::from_secs(2)),
        ..SocketConfig::new(destination)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = SocketRegistry::new();

    let mut server = AsyncOscSocket::open(loopback("127.0.0.1:9".into()), &registry).await?;
    let server_addr = server.local_addr()?;
    let mut client = AsyncOscSocket::open(loopback(server_addr.to_string()), &registry).await?;

    let server_task = tokio::spawn(async move {
        let (ping, from) = server.receive_from().await?;
        eprintln!("server got {} from {from}", ping.address());
        Ok::<_, oscprims::transport::TransportError>(ping.get_int(0)?)
    });

    let mut ping = OscMessage::new("/ping")?;
    ping.push_int32(1)?;
    client.send(ping).await?;

    let seq = server_task.await??;
    eprintln!("ping sequence {seq}, {} sockets open", registry.open_sockets());
    Ok(())
}
