use std::fs;
use std::io::Read;

use ceprims_binary::{Headers, CONTENT_TYPE_HEADER};
use ceprims_event::{Event, EventError};
use ceprims_format::{FormatError, JsonFormat, CONTENT_TYPE};
use ceprims_record::RecordDeserializer;
use tracing::debug;

use crate::cmd::{parse_pair, DecodeArgs, Mode};
use crate::exit::{format_error, io_error, record_error, CliResult, SUCCESS};
use crate::output::{print_event, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let headers = build_headers(&args)?;
    let value = read_input(&args)?;

    let event = RecordDeserializer::new()
        .deserialize(&headers, value.as_deref())
        .map_err(|err| record_error("decode failed", err))?;
    debug!(id = event.id(), ty = event.ty(), "event decoded");

    let document = render_document(&event)?;
    print_event(&event, &document, format);

    Ok(SUCCESS)
}

fn build_headers(args: &DecodeArgs) -> CliResult<Headers> {
    let mut headers = Headers::new();
    if matches!(args.mode, Mode::Structured) {
        headers.insert(CONTENT_TYPE_HEADER, CONTENT_TYPE);
    }
    for header in &args.header {
        let (name, value) = parse_pair("header", header)?;
        headers.insert(name, value.to_string());
    }
    Ok(headers)
}

fn read_input(args: &DecodeArgs) -> CliResult<Option<Vec<u8>>> {
    match (&args.input, args.mode) {
        (Some(path), _) => fs::read(path)
            .map(Some)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        (None, Mode::Structured) => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(Some(buf))
        }
        (None, Mode::Binary) => Ok(None),
    }
}

/// Structured rendering used for JSON output. Falls back to `data_base64`
/// when the payload cannot be embedded under its declared content type.
fn render_document(event: &Event) -> CliResult<Vec<u8>> {
    match JsonFormat::new().serialize_event(event) {
        Ok(document) => Ok(document),
        Err(FormatError::Event(EventError::EncodingConflict(reason))) => {
            debug!(%reason, "rendering payload as data_base64");
            JsonFormat::with_force_data_base64()
                .serialize_event(event)
                .map_err(|err| format_error("render failed", err))
        }
        Err(err) => Err(format_error("render failed", err)),
    }
}
