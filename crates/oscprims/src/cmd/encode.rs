use crate::cmd::args::build_message;
use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut message = build_message(&args.address, &args.args)?;
    let wire = message.finalize();
    print_encoded(message.address(), message.type_tags(), &wire, format);
    Ok(SUCCESS)
}
