use std::io::{IsTerminal, Write};
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oscprims_codec::{MessageView, OscArg};
use serde::Serialize;
use serde_json::Value;

use crate::exit::{codec_error, CliResult};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ArgumentOutput {
    index: usize,
    tag: char,
    value: Value,
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    address: &'a str,
    type_tags: &'a str,
    size: usize,
    arguments: Vec<ArgumentOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    timestamp: String,
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    address: &'a str,
    type_tags: &'a str,
    size: usize,
    hex: String,
}

/// Print a decoded message. Fails if an argument cannot be located.
pub fn print_message(
    view: &MessageView,
    from: Option<SocketAddr>,
    format: OutputFormat,
) -> CliResult<()> {
    let arguments = || {
        view.arguments()
            .map_err(|err| codec_error("decode failed", err))
    };

    match format {
        OutputFormat::Json => {
            let arguments = arguments()?;
            let out = MessageOutput {
                address: view.address(),
                type_tags: view.type_tags(),
                size: view.as_bytes().len(),
                arguments: arguments
                    .iter()
                    .enumerate()
                    .map(|(index, arg)| ArgumentOutput {
                        index,
                        tag: arg.type_tag().as_char(),
                        value: arg_json(arg),
                    })
                    .collect(),
                from: from.map(|addr| addr.to_string()),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let arguments = arguments()?;
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "TAG", "TYPE", "VALUE"]);
            for (index, arg) in arguments.iter().enumerate() {
                let tag = arg.type_tag();
                table.add_row(vec![
                    index.to_string(),
                    tag.as_char().to_string(),
                    tag.name().to_string(),
                    arg_text(arg),
                ]);
            }
            match from {
                Some(addr) => println!("{} {} from {addr}", view.address(), view.type_tags()),
                None => println!("{} {}", view.address(), view.type_tags()),
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let rendered: Vec<String> = arguments()?.iter().map(arg_text).collect();
            let sender = from.map(|addr| format!(" from={addr}")).unwrap_or_default();
            println!(
                "address={} tags={} size={}{} args=[{}]",
                view.address(),
                view.type_tags(),
                view.as_bytes().len(),
                sender,
                rendered.join(", ")
            );
        }
        OutputFormat::Raw => print_raw(view.as_bytes()),
    }
    Ok(())
}

/// Print a freshly encoded wire buffer.
pub fn print_encoded(address: &str, type_tags: &str, wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                address,
                type_tags,
                size: wire.len(),
                hex: hex::encode(wire),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "BYTES", "ASCII"]);
            for (row, word) in wire.chunks(4).enumerate() {
                table.add_row(vec![
                    format!("{:04}", row * 4),
                    hex::encode(word),
                    ascii_preview(word),
                ]);
            }
            println!("{address} {type_tags} ({} bytes)", wire.len());
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let words: Vec<String> = wire.chunks(4).map(hex::encode).collect();
            println!("{}", words.join(" "));
        }
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn arg_json(arg: &OscArg) -> Value {
    match arg {
        OscArg::Int32(v) => Value::from(*v),
        OscArg::Int64(v) => Value::from(*v),
        OscArg::Float32(v) => Value::from(f64::from(*v)),
        OscArg::Float64(v) => Value::from(*v),
        OscArg::String(v) => Value::from(v.as_str()),
        OscArg::Blob(v) => Value::from(hex::encode(v)),
        OscArg::Bool(v) => Value::from(*v),
        OscArg::Infinitum => Value::from("inf"),
    }
}

fn arg_text(arg: &OscArg) -> String {
    match arg {
        OscArg::Int32(v) => v.to_string(),
        OscArg::Int64(v) => v.to_string(),
        OscArg::Float32(v) => v.to_string(),
        OscArg::Float64(v) => v.to_string(),
        OscArg::String(v) => format!("{v:?}"),
        OscArg::Blob(v) => format!("<blob {} bytes: {}>", v.len(), hex::encode(v)),
        OscArg::Bool(v) => v.to_string(),
        OscArg::Infinitum => "inf".to_string(),
    }
}

fn ascii_preview(word: &[u8]) -> String {
    word.iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
        .collect()
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_values_follow_argument_type() {
        assert_eq!(arg_json(&OscArg::Int32(-3)), Value::from(-3));
        assert_eq!(arg_json(&OscArg::Float32(0.5)), Value::from(0.5));
        assert_eq!(arg_json(&OscArg::Bool(true)), Value::Bool(true));
        assert_eq!(arg_json(&OscArg::Infinitum), Value::from("inf"));
        assert_eq!(
            arg_json(&OscArg::from(vec![0xde, 0xad])),
            Value::from("dead")
        );
    }

    #[test]
    fn nan_serializes_as_null() {
        assert_eq!(arg_json(&OscArg::Float64(f64::NAN)), Value::Null);
    }

    #[test]
    fn ascii_preview_masks_padding() {
        assert_eq!(ascii_preview(b"/fo\0"), "/fo.");
    }
}
