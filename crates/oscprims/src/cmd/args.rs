//! Typed message arguments on the command line.
//!
//! Each argument is `<tag>:<value>` for payload-bearing types, or a bare
//! `T`, `F` or `I`.

use oscprims_codec::{OscArg, OscMessage};

use crate::exit::{CliError, CliResult, USAGE};

pub fn parse_arg(token: &str) -> CliResult<OscArg> {
    match token {
        "T" => return Ok(OscArg::Bool(true)),
        "F" => return Ok(OscArg::Bool(false)),
        "I" => return Ok(OscArg::Infinitum),
        _ => {}
    }

    let (tag, value) = token.split_once(':').ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("argument {token:?} must be <tag>:<value> or one of T, F, I"),
        )
    })?;

    let invalid = |kind: &str| CliError::new(USAGE, format!("invalid {kind} argument: {value:?}"));

    match tag {
        "i" => value.parse().map(OscArg::Int32).map_err(|_| invalid("int32")),
        "h" => value.parse().map(OscArg::Int64).map_err(|_| invalid("int64")),
        "f" => value.parse().map(OscArg::Float32).map_err(|_| invalid("float32")),
        "d" => value.parse().map(OscArg::Float64).map_err(|_| invalid("float64")),
        "s" => Ok(OscArg::String(value.to_string())),
        "b" => hex::decode(value)
            .map(OscArg::from)
            .map_err(|_| invalid("blob")),
        other => Err(CliError::new(
            USAGE,
            format!("unknown argument tag {other:?} (expected i, h, f, d, s, b, T, F, I)"),
        )),
    }
}

/// Build an unfinalized message from an address and argument tokens.
pub fn build_message(address: &str, tokens: &[String]) -> CliResult<OscMessage> {
    let mut message = OscMessage::new(address)
        .map_err(|err| CliError::new(USAGE, format!("invalid message: {err}")))?;
    for token in tokens {
        let arg = parse_arg(token)?;
        message
            .push_arg(arg)
            .map_err(|err| CliError::new(USAGE, format!("invalid argument {token:?}: {err}")))?;
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_tag() {
        assert_eq!(parse_arg("i:-5").unwrap(), OscArg::Int32(-5));
        assert_eq!(parse_arg("h:4294967296").unwrap(), OscArg::Int64(1 << 32));
        assert_eq!(parse_arg("f:0.25").unwrap(), OscArg::Float32(0.25));
        assert_eq!(parse_arg("d:1.5").unwrap(), OscArg::Float64(1.5));
        assert_eq!(parse_arg("s:a:b").unwrap(), OscArg::String("a:b".into()));
        assert_eq!(parse_arg("b:00ff").unwrap(), OscArg::from(vec![0x00, 0xff]));
        assert_eq!(parse_arg("T").unwrap(), OscArg::Bool(true));
        assert_eq!(parse_arg("F").unwrap(), OscArg::Bool(false));
        assert_eq!(parse_arg("I").unwrap(), OscArg::Infinitum);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["42", "i:abc", "x:1", "b:zz", "i:99999999999"] {
            assert_eq!(parse_arg(token).unwrap_err().code, USAGE, "{token}");
        }
    }

    #[test]
    fn builds_message_in_order() {
        let tokens = ["i:42", "s:hi", "T"].map(String::from);
        let message = build_message("/foo", &tokens).unwrap();
        assert_eq!(message.type_tags(), ",isT");
    }

    #[test]
    fn invalid_address_is_usage_error() {
        assert_eq!(build_message("foo", &[]).unwrap_err().code, USAGE);
        assert_eq!(
            build_message("/foo", &["s:a\0b".to_string()]).unwrap_err().code,
            USAGE
        );
    }
}
