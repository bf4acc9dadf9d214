//! Minimal OSC echo server: replies to every message with the same arguments
//! under `/echo<address>`.
//!
//! Run with:
//!   cargo run --example echo-server
//!
//! In another terminal:
//!   cargo run --features cli -- send 127.0.0.1:57120 /hello s:world i:1 \
//!     --wait --wait-timeout 3s

use oscprims::codec::OscMessage;
use oscprims::transport::{OscSocket, SocketConfig, SocketRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = SocketRegistry::new();
    let config = SocketConfig {
        local_port: 57120,
        ..SocketConfig::default()
    };
    let mut socket = OscSocket::open(config, &registry)?;
    eprintln!("Listening on {}", socket.local_addr()?);

    loop {
        let (request, from) = match socket.receive_from() {
            Ok(received) => received,
            Err(e) => {
                eprintln!("Dropped datagram: {e}");
                continue;
            }
        };
        eprintln!(
            "Received {} {} from {from}",
            request.address(),
            request.type_tags()
        );

        let mut reply = OscMessage::new(format!("/echo{}", request.address()))?;
        for arg in request.arguments()? {
            reply.push_arg(arg)?;
        }
        socket.send_to(&mut reply, from)?;
    }
}
