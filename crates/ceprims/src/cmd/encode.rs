use std::fs;
use std::sync::Arc;

use ceprims_binary::{infer_extension_value, Headers};
use ceprims_event::{parse_time, Event};
use ceprims_format::JsonFormat;
use ceprims_record::RecordSerializer;
use tracing::debug;

use crate::cmd::{parse_pair, EncodeArgs, Mode};
use crate::exit::{event_error, record_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_binary, print_document, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let event = build_event(&args)?;
    let json = if args.base64 {
        JsonFormat::with_force_data_base64()
    } else {
        JsonFormat::new()
    };
    let serializer = RecordSerializer::with_format(args.mode.into(), Arc::new(json));

    let mut headers = Headers::new();
    let value = serializer
        .serialize(&event, &mut headers)
        .map_err(|err| record_error("encode failed", err))?;
    debug!(mode = ?args.mode, headers = headers.len(), "event encoded");

    match args.mode {
        Mode::Structured => print_document(value.as_deref().unwrap_or_default(), format),
        Mode::Binary => print_binary(&headers, value.as_ref(), format),
    }

    Ok(SUCCESS)
}

fn build_event(args: &EncodeArgs) -> CliResult<Event> {
    let mut builder = Event::builder()
        .id(args.id.as_str())
        .source(args.source.as_str())
        .ty(args.ty.as_str());

    if let Some(subject) = &args.subject {
        builder = builder.subject(subject.as_str());
    }
    if let Some(time) = &args.time {
        let time = parse_time(time)
            .map_err(|err| CliError::new(USAGE, format!("--time is not RFC 3339: {err}")))?;
        builder = builder.time(time);
    }
    if let Some(schema) = &args.data_schema {
        builder = builder.data_schema(schema.as_str());
    }

    let content_type = match (&args.data_content_type, &args.json) {
        (Some(content_type), _) => Some(content_type.clone()),
        (None, Some(_)) => Some("application/json".to_string()),
        (None, None) => None,
    };
    if let Some(content_type) = content_type {
        builder = builder.data_content_type(content_type);
    }
    if let Some(payload) = resolve_payload(args)? {
        builder = builder.data(payload);
    }

    for ext in &args.ext {
        let (name, value) = parse_pair("ext", ext)?;
        builder = builder.extension(name, infer_extension_value(value));
    }

    builder
        .build()
        .map_err(|err| event_error("invalid event", err))
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Option<Vec<u8>>> {
    if let Some(json) = &args.json {
        serde_json::from_str::<serde_json::Value>(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
        return Ok(Some(json.as_bytes().to_vec()));
    }
    if let Some(data) = &args.data {
        return Ok(Some(data.as_bytes().to_vec()));
    }
    if let Some(path) = &args.file {
        return fs::read(path).map(Some).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        });
    }
    Ok(None)
}
