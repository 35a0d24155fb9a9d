use bytes::Bytes;
use ceprims_event::{
    format_time, parse_time, validate_extension_name, Event, EventBuilder, EventError,
    ExtensionValue, Result, DATACONTENTTYPE, DATASCHEMA, ID, SOURCE, SPECVERSION, SUBJECT, TIME,
    TYPE,
};
use tracing::trace;

use crate::headers::{Headers, CE_HEADER_PREFIX, CONTENT_TYPE_HEADER};

/// An event split into transport headers and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryMessage {
    pub headers: Headers,
    /// Raw `data`; `None` when the event carries no payload.
    pub body: Option<Bytes>,
}

fn header_name(attribute: &str) -> String {
    format!("{CE_HEADER_PREFIX}{attribute}")
}

/// Map an event onto headers and body.
pub fn encode(event: &Event) -> BinaryMessage {
    let mut headers = Headers::new();
    headers.insert(header_name(SPECVERSION), event.spec_version().as_str());
    headers.insert(header_name(ID), event.id().to_string());
    headers.insert(header_name(SOURCE), event.source().to_string());
    headers.insert(header_name(TYPE), event.ty().to_string());
    if let Some(subject) = event.subject() {
        headers.insert(header_name(SUBJECT), subject.to_string());
    }
    if let Some(time) = event.time() {
        headers.insert(header_name(TIME), format_time(time));
    }
    if let Some(schema) = event.data_schema() {
        headers.insert(header_name(DATASCHEMA), schema.to_string());
    }
    for (name, value) in event.extensions() {
        headers.insert(header_name(name), value.to_string());
    }
    if let Some(content_type) = event.data_content_type() {
        headers.insert(CONTENT_TYPE_HEADER, content_type.to_string());
    }

    BinaryMessage {
        headers,
        body: event.data().cloned(),
    }
}

/// Rebuild an event from headers and body.
///
/// Headers without the `ce_` prefix, other than `content-type`, belong to the
/// transport and are ignored.
pub fn decode(headers: &Headers, body: Option<&[u8]>) -> Result<Event> {
    let mut builder = EventBuilder::new();
    let mut content_type = None;
    let mut ce_content_type = None;

    for (name, value) in headers.iter() {
        let lower = name.to_ascii_lowercase();
        if lower == CONTENT_TYPE_HEADER {
            content_type = Some(header_text(name, value)?.to_string());
            continue;
        }
        let Some(attribute) = lower.strip_prefix(CE_HEADER_PREFIX) else {
            trace!(header = name, "skipping transport header");
            continue;
        };

        let text = header_text(name, value)?;
        builder = match attribute {
            ID => builder.id(text),
            SOURCE => builder.source(text),
            SPECVERSION => builder.spec_version_str(text),
            TYPE => builder.ty(text),
            SUBJECT => builder.subject(text),
            TIME => builder.time(parse_time(text).map_err(EventError::into_malformed)?),
            DATASCHEMA => builder.data_schema(text),
            DATACONTENTTYPE => {
                ce_content_type = Some(text.to_string());
                builder
            }
            extension => {
                validate_extension_name(extension).map_err(EventError::into_malformed)?;
                builder.extension(extension, infer_extension_value(text))
            }
        };
    }

    if let Some(content_type) = content_type.or(ce_content_type) {
        builder = builder.data_content_type(content_type);
    }
    if let Some(body) = body {
        builder = builder.data(Bytes::copy_from_slice(body));
    }

    builder.build().map_err(EventError::into_malformed)
}

fn header_text<'a>(name: &str, value: &'a Bytes) -> Result<&'a str> {
    std::str::from_utf8(value)
        .map_err(|_| EventError::Malformed(format!("header {name} is not valid UTF-8")))
}

/// Recover an extension value from header text.
///
/// The grammar is fixed and total:
/// 1. `true` / `false` is a boolean;
/// 2. `-?[0-9]+` within the 32-bit range is an integer;
/// 3. anything else is a string.
///
/// A string extension whose text matches 1 or 2 comes back typed. Leading
/// zeros are accepted by rule 2 and dropped on re-encode.
pub fn infer_extension_value(text: &str) -> ExtensionValue {
    match text {
        "true" => return ExtensionValue::Boolean(true),
        "false" => return ExtensionValue::Boolean(false),
        _ => {}
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = text.parse::<i32>() {
            return ExtensionValue::Integer(n);
        }
    }

    ExtensionValue::String(text.to_string())
}
