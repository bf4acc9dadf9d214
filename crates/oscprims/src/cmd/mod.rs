use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod args;
pub mod decode;
pub mod encode;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a message and print its wire bytes.
    Encode(EncodeArgs),
    /// Decode wire bytes and print the message.
    Decode(DecodeArgs),
    /// Send a single message over UDP.
    Send(SendArgs),
    /// Listen on a UDP port and print received messages.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// OSC address, e.g. /synth/freq.
    pub address: String,
    /// Arguments: i:<int32> h:<int64> f:<float32> d:<float64> s:<text> b:<hex> T F I.
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire bytes as hex (whitespace ignored). Reads stdin when omitted.
    #[arg(conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read raw wire bytes from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Byte length of each blob argument, in order (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub blob_lengths: Vec<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Destination as host:port.
    pub destination: String,
    /// OSC address, e.g. /synth/freq.
    pub address: String,
    /// Arguments: i:<int32> h:<int64> f:<float32> d:<float64> s:<text> b:<hex> T F I.
    pub args: Vec<String>,
    /// Local address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,
    /// Local port to bind (0 picks an ephemeral port).
    #[arg(long, default_value_t = 0)]
    pub local_port: u16,
    /// Wait for one reply message and print it.
    #[arg(long)]
    pub wait: bool,
    /// Maximum time to wait for the reply when --wait is set (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub wait_timeout: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// UDP port to listen on.
    pub port: u16,
    /// Local address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,
    /// Exit after receiving N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Give up after this long without reaching --count (e.g. 10s, 500ms).
    #[arg(long)]
    pub timeout: Option<String>,
    /// Receive buffer size in bytes; longer datagrams are cut off.
    #[arg(long, default_value_t = oscprims_transport::DEFAULT_RECV_BUFFER_SIZE)]
    pub buffer_size: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
