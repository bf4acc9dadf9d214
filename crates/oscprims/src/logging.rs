//! Stderr logging for the CLI.
//!
//! `--log-level` sets the level for every target. `--log-target` raises or
//! lowers single crates, e.g. `oscprims_transport=trace` to watch socket leases
//! or `oscprims_codec=debug` to see every finalized message.

use std::str::FromStr;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// A `TARGET=LEVEL` override, e.g. `oscprims_codec=trace`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetLevel {
    pub target: String,
    pub level: LogLevel,
}

impl FromStr for TargetLevel {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (target, level) = input
            .split_once('=')
            .ok_or_else(|| format!("expected TARGET=LEVEL, got {input:?}"))?;
        let target = target.trim();
        if target.is_empty() {
            return Err(format!("empty target in {input:?}"));
        }
        let level = LogLevel::from_str(level.trim(), true)?;
        Ok(Self {
            target: target.to_string(),
            level,
        })
    }
}

/// Per-target filter: the global level plus the more specific overrides.
pub fn build_filter(level: LogLevel, overrides: &[TargetLevel]) -> Targets {
    overrides.iter().fold(
        Targets::new().with_default(level.as_filter()),
        |targets, o| targets.with_target(o.target.clone(), o.level.as_filter()),
    )
}

/// Install the stderr subscriber. Stdout stays reserved for command output.
pub fn init_logging(format: LogFormat, level: LogLevel, overrides: &[TargetLevel]) {
    let registry = tracing_subscriber::registry().with(build_filter(level, overrides));

    // Targets are shown so per-crate overrides can be told apart in the output.
    let _ = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
}
