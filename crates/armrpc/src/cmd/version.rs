use serde_json::json;

use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_record(
        format,
        &json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    );
    Ok(SUCCESS)
}
