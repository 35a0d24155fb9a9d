use ceprims_format::FormatRegistry;

use crate::cmd::FormatsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_formats, OutputFormat};

pub fn run(_args: FormatsArgs, format: OutputFormat) -> CliResult<i32> {
    let content_types = FormatRegistry::global().content_types();
    print_formats(&content_types, format);
    Ok(SUCCESS)
}
