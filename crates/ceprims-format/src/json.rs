use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use ceprims_event::{
    format_time, parse_time, validate_extension_name, Event, EventBuilder, EventError,
    ExtensionValue, DATA, DATACONTENTTYPE, DATASCHEMA, DATA_BASE64, ID, SOURCE, SPECVERSION,
    SUBJECT, TIME, TYPE,
};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;
use tracing::trace;

use crate::config::JsonFormatConfig;
use crate::content_type::is_json_content_type;
use crate::error::Result;
use crate::registry::EventFormat;

/// Content type of a single structured JSON event.
pub const CONTENT_TYPE: &str = "application/cloudevents+json";

/// Content type of a JSON array of structured events.
pub const BATCH_CONTENT_TYPE: &str = "application/cloudevents-batch+json";

/// Structured JSON event format.
///
/// Wire format: one JSON object with the context attributes, the extensions
/// flattened next to them, and the payload under `data` (embedded JSON) or
/// `data_base64` (anything else).
///
/// ```text
/// {
///   "specversion": "1.0", "id": "e1", "source": "/people/p1",
///   "type": "AddressChanged", "datacontenttype": "application/json",
///   "anumber": 10,
///   "data": {"zip":"10001"}
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    config: JsonFormatConfig,
}

impl JsonFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: JsonFormatConfig) -> Self {
        Self { config }
    }

    /// A format that always writes `data_base64`.
    pub fn with_force_data_base64() -> Self {
        Self::with_config(JsonFormatConfig {
            force_data_base64: true,
        })
    }

    pub fn config(&self) -> &JsonFormatConfig {
        &self.config
    }

    /// Serialize one event into a JSON document.
    pub fn serialize_event(&self, event: &Event) -> Result<Vec<u8>> {
        let doc = StructuredEvent::new(event, self.config)?;
        Ok(serde_json::to_vec(&doc).map_err(serialize_failed)?)
    }

    /// Deserialize one event from a JSON document.
    pub fn deserialize_event(&self, bytes: &[u8]) -> Result<Event> {
        let Fields(fields) = serde_json::from_slice::<Fields>(bytes)
            .map_err(|err| EventError::Malformed(format!("not a JSON object: {err}")))?;
        Ok(event_from_fields(fields)?)
    }

    /// Serialize events into a JSON array.
    pub fn serialize_batch(&self, events: &[Event]) -> Result<Vec<u8>> {
        let docs = events
            .iter()
            .map(|event| StructuredEvent::new(event, self.config))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(serde_json::to_vec(&Batch(&docs)).map_err(serialize_failed)?)
    }

    /// Deserialize a JSON array of events.
    pub fn deserialize_batch(&self, bytes: &[u8]) -> Result<Vec<Event>> {
        let docs: Vec<Fields> = serde_json::from_slice(bytes)
            .map_err(|err| EventError::Malformed(format!("not a JSON array of objects: {err}")))?;
        docs.into_iter()
            .map(|Fields(fields)| event_from_fields(fields).map_err(Into::into))
            .collect()
    }
}

impl EventFormat for JsonFormat {
    fn content_type(&self) -> &str {
        CONTENT_TYPE
    }

    fn serialize(&self, event: &Event) -> Result<Vec<u8>> {
        self.serialize_event(event)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Event> {
        self.deserialize_event(bytes)
    }
}

fn serialize_failed(err: serde_json::Error) -> EventError {
    EventError::EncodingConflict(format!("structured serialization failed: {err}"))
}

enum DataField<'a> {
    Absent,
    Json(&'a RawValue),
    Base64(String),
}

struct StructuredEvent<'a> {
    event: &'a Event,
    data: DataField<'a>,
}

impl<'a> StructuredEvent<'a> {
    fn new(event: &'a Event, config: JsonFormatConfig) -> std::result::Result<Self, EventError> {
        let data = match event.data() {
            None => DataField::Absent,
            Some(bytes) => place_data(event.data_content_type(), bytes, config)?,
        };
        Ok(Self { event, data })
    }
}

fn place_data<'a>(
    content_type: Option<&str>,
    bytes: &'a Bytes,
    config: JsonFormatConfig,
) -> std::result::Result<DataField<'a>, EventError> {
    if config.force_data_base64 || !is_json_content_type(content_type) {
        return Ok(DataField::Base64(STANDARD.encode(bytes)));
    }
    // No JSON value represents zero bytes.
    if bytes.is_empty() {
        return Ok(DataField::Base64(String::new()));
    }

    match serde_json::from_slice::<&RawValue>(bytes) {
        // Surrounding whitespace would be lost when embedded.
        Ok(raw) if raw.get().len() == bytes.len() => Ok(DataField::Json(raw)),
        Ok(_) => {
            trace!("payload has surrounding whitespace, writing data_base64");
            Ok(DataField::Base64(STANDARD.encode(bytes)))
        }
        Err(err) if content_type.is_some() => Err(EventError::EncodingConflict(format!(
            "data declared as {} is not valid JSON: {err}",
            content_type.unwrap_or_default()
        ))),
        Err(_) => {
            trace!("undeclared payload is not JSON, writing data_base64");
            Ok(DataField::Base64(STANDARD.encode(bytes)))
        }
    }
}

impl Serialize for StructuredEvent<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let event = self.event;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(SPECVERSION, event.spec_version().as_str())?;
        map.serialize_entry(ID, event.id())?;
        map.serialize_entry(SOURCE, event.source())?;
        map.serialize_entry(TYPE, event.ty())?;
        if let Some(subject) = event.subject() {
            map.serialize_entry(SUBJECT, subject)?;
        }
        if let Some(time) = event.time() {
            map.serialize_entry(TIME, &format_time(time))?;
        }
        if let Some(content_type) = event.data_content_type() {
            map.serialize_entry(DATACONTENTTYPE, content_type)?;
        }
        if let Some(schema) = event.data_schema() {
            map.serialize_entry(DATASCHEMA, schema)?;
        }
        for (name, value) in event.extensions() {
            match value {
                ExtensionValue::String(s) => map.serialize_entry(name, s)?,
                ExtensionValue::Boolean(b) => map.serialize_entry(name, b)?,
                ExtensionValue::Integer(n) => map.serialize_entry(name, n)?,
            }
        }
        match &self.data {
            DataField::Absent => {}
            DataField::Json(raw) => map.serialize_entry(DATA, raw)?,
            DataField::Base64(encoded) => map.serialize_entry(DATA_BASE64, encoded)?,
        }
        map.end()
    }
}

struct Batch<'a>(&'a [StructuredEvent<'a>]);

impl Serialize for Batch<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for doc in self.0 {
            seq.serialize_element(doc)?;
        }
        seq.end()
    }
}

/// Top-level members of a structured document, keyed by lowercased name.
///
/// Attribute names are case-insensitive, so two keys that fold to the same
/// name are rejected, exact repeats included.
struct Fields(BTreeMap<String, Box<RawValue>>);

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FieldsVisitor)
    }
}

struct FieldsVisitor;

impl<'de> Visitor<'de> for FieldsVisitor {
    type Value = Fields;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Fields, A::Error> {
        let mut fields = BTreeMap::new();
        while let Some((key, raw)) = map.next_entry::<String, Box<RawValue>>()? {
            let lower = key.to_ascii_lowercase();
            if fields.insert(lower, raw).is_some() {
                return Err(de::Error::custom(format!(
                    "duplicate attribute {key:?} (names are case-insensitive)"
                )));
            }
        }
        Ok(Fields(fields))
    }
}

fn event_from_fields(
    fields: BTreeMap<String, Box<RawValue>>,
) -> std::result::Result<Event, EventError> {
    let mut builder = EventBuilder::new();
    let mut data_content_type = None;
    let mut data = None;
    let mut data_base64 = None;

    for (name, raw) in fields {
        match name.as_str() {
            ID => builder = builder.id(required_string(ID, &raw)?),
            SOURCE => builder = builder.source(required_string(SOURCE, &raw)?),
            SPECVERSION => builder = builder.spec_version_str(required_string(SPECVERSION, &raw)?),
            TYPE => builder = builder.ty(required_string(TYPE, &raw)?),
            SUBJECT => {
                if let Some(subject) = optional_string(SUBJECT, &raw)? {
                    builder = builder.subject(subject);
                }
            }
            TIME => {
                if let Some(time) = optional_string(TIME, &raw)? {
                    builder = builder.time(parse_time(&time).map_err(EventError::into_malformed)?);
                }
            }
            DATACONTENTTYPE => data_content_type = optional_string(DATACONTENTTYPE, &raw)?,
            DATASCHEMA => {
                if let Some(schema) = optional_string(DATASCHEMA, &raw)? {
                    builder = builder.data_schema(schema);
                }
            }
            DATA => data = Some(raw),
            DATA_BASE64 => data_base64 = Some(raw),
            _ => {
                validate_extension_name(&name).map_err(EventError::into_malformed)?;
                if let Some(value) = extension_value(&name, &raw)? {
                    builder = builder.extension(name, value);
                }
            }
        }
    }

    let payload = match (data, data_base64) {
        (Some(_), Some(_)) => {
            return Err(EventError::Malformed(
                "both data and data_base64 are present".to_string(),
            ))
        }
        (Some(raw), None) => Some(embedded_data(data_content_type.as_deref(), &raw)?),
        (None, Some(raw)) => Some(base64_data(&raw)?),
        (None, None) => None,
    };

    if let Some(content_type) = data_content_type {
        builder = builder.data_content_type(content_type);
    }
    if let Some(payload) = payload {
        builder = builder.data(payload);
    }

    builder.build().map_err(EventError::into_malformed)
}

fn parse_raw(name: &str, raw: &RawValue) -> std::result::Result<Value, EventError> {
    serde_json::from_str(raw.get())
        .map_err(|err| EventError::Malformed(format!("attribute {name}: {err}")))
}

fn required_string(name: &str, raw: &RawValue) -> std::result::Result<String, EventError> {
    match parse_raw(name, raw)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::String(_) => Err(EventError::Malformed(format!(
            "required attribute {name} is empty"
        ))),
        _ => Err(EventError::Malformed(format!(
            "required attribute {name} must be a string"
        ))),
    }
}

fn optional_string(name: &str, raw: &RawValue) -> std::result::Result<Option<String>, EventError> {
    match parse_raw(name, raw)? {
        Value::String(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        _ => Err(EventError::Malformed(format!(
            "attribute {name} must be a string"
        ))),
    }
}

fn extension_value(
    name: &str,
    raw: &RawValue,
) -> std::result::Result<Option<ExtensionValue>, EventError> {
    match parse_raw(name, raw)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(ExtensionValue::String(s))),
        Value::Bool(b) => Ok(Some(ExtensionValue::Boolean(b))),
        Value::Number(n) => {
            let integer = n.as_i64().and_then(|n| i32::try_from(n).ok());
            Ok(Some(match integer {
                Some(n) => ExtensionValue::Integer(n),
                None => ExtensionValue::String(n.to_string()),
            }))
        }
        Value::Array(_) | Value::Object(_) => Err(EventError::Malformed(format!(
            "extension {name} must be a string, boolean or number"
        ))),
    }
}

fn embedded_data(
    content_type: Option<&str>,
    raw: &RawValue,
) -> std::result::Result<Bytes, EventError> {
    if !is_json_content_type(content_type) {
        if let Value::String(text) = parse_raw(DATA, raw)? {
            return Ok(Bytes::from(text));
        }
    }
    Ok(Bytes::copy_from_slice(raw.get().as_bytes()))
}

fn base64_data(raw: &RawValue) -> std::result::Result<Bytes, EventError> {
    match parse_raw(DATA_BASE64, raw)? {
        Value::String(encoded) => STANDARD
            .decode(encoded)
            .map(Bytes::from)
            .map_err(|err| EventError::Malformed(format!("data_base64 is not valid base64: {err}"))),
        _ => Err(EventError::Malformed(
            "data_base64 must be a string".to_string(),
        )),
    }
}
