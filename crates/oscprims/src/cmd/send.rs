use oscprims_transport::{OscSocket, SocketConfig, SocketRegistry};
use tracing::info;

use crate::cmd::args::build_message;
use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let mut message = build_message(&args.address, &args.args)?;

    let config = SocketConfig {
        bind_addr: args.bind,
        local_port: args.local_port,
        read_timeout: Some(wait_timeout),
        ..SocketConfig::new(args.destination.clone())
    };
    let registry = SocketRegistry::new();
    let mut socket =
        OscSocket::open(config, &registry).map_err(|err| transport_error("open failed", err))?;

    let sent = socket
        .send(&mut message)
        .map_err(|err| transport_error("send failed", err))?;
    info!(
        address = message.address(),
        type_tags = message.type_tags(),
        bytes = sent,
        destination = %socket.destination(),
        "message sent"
    );

    if args.wait {
        let (reply, from) = socket
            .receive_from()
            .map_err(|err| transport_error("receive failed", err))?;
        print_message(&reply, Some(from), format)?;
    }

    socket.close();
    Ok(SUCCESS)
}
