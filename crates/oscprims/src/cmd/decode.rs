use std::fs;
use std::io::Read;

use oscprims_codec::MessageView;

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = read_input(&args)?;
    let view = MessageView::parse(&wire)
        .map_err(|err| codec_error("decode failed", err))?
        .with_blob_lengths(args.blob_lengths);
    print_message(&view, None, format)?;
    Ok(SUCCESS)
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }

    let text = match &args.hex {
        Some(hex) => hex.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            buf
        }
    };
    decode_hex(&text)
}

fn decode_hex(text: &str) -> CliResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_input_ignores_whitespace() {
        let bytes = decode_hex("2f70 696e\n6700 0000").unwrap();
        assert_eq!(bytes, b"/ping\0\0\0");
    }

    #[test]
    fn odd_hex_is_data_invalid() {
        assert_eq!(decode_hex("abc").unwrap_err().code, DATA_INVALID);
    }
}
