use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use oscprims_transport::{OscSocket, SocketConfig, SocketRegistry, TransportError};
use tracing::{info, warn};

use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{transport_error, CliError, CliResult, INTERNAL, SUCCESS, TIMEOUT};
use crate::output::{print_message, OutputFormat};

// Receive timeout used to poll the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let deadline = args
        .timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?
        .map(|limit| Instant::now() + limit);

    let config = SocketConfig {
        bind_addr: args.bind,
        local_port: args.port,
        recv_buffer_size: args.buffer_size,
        read_timeout: Some(POLL_INTERVAL),
        // Replies are never sent; the destination only has to resolve.
        ..SocketConfig::new(SocketAddr::new(args.bind, 9).to_string())
    };
    let registry = SocketRegistry::new();
    let mut socket =
        OscSocket::open(config, &registry).map_err(|err| transport_error("bind failed", err))?;
    if let Ok(local) = socket.local_addr() {
        info!(%local, "listening");
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(CliError::new(
                TIMEOUT,
                format!("timed out after receiving {printed} messages"),
            ));
        }

        let (message, from) = match socket.receive_from() {
            Ok(received) => received,
            Err(TransportError::Timeout(_)) => continue,
            Err(TransportError::Codec(err)) => {
                warn!(error = %err, "dropping malformed datagram");
                continue;
            }
            Err(err) => return Err(transport_error("receive failed", err)),
        };

        if let Err(err) = print_message(&message, Some(from), format) {
            warn!(error = %err, "dropping undecodable message");
            continue;
        }
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    socket.close();
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
