use ceprims_binary::{decode, Headers, CONTENT_TYPE_HEADER};
use ceprims_event::{Event, EventError};
use ceprims_format::{media_type, FormatRegistry};
use tracing::debug;

use crate::error::Result;

/// Media type prefix shared by all structured event formats.
const STRUCTURED_PREFIX: &str = "application/cloudevents";

/// Turns record headers and value back into events.
///
/// The encoding is detected per record: a `content-type` of
/// `application/cloudevents*` means structured, anything else binary.
#[derive(Debug, Clone, Copy)]
pub struct RecordDeserializer<'r> {
    registry: &'r FormatRegistry,
}

impl RecordDeserializer<'static> {
    /// Create a deserializer backed by the global format registry.
    pub fn new() -> Self {
        Self::with_registry(FormatRegistry::global())
    }
}

impl Default for RecordDeserializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> RecordDeserializer<'r> {
    /// Create a deserializer backed by `registry`.
    pub fn with_registry(registry: &'r FormatRegistry) -> Self {
        Self { registry }
    }

    pub fn deserialize(&self, headers: &Headers, value: Option<&[u8]>) -> Result<Event> {
        match headers.get_str(CONTENT_TYPE_HEADER) {
            Some(content_type) if is_structured(content_type) => {
                debug!(content_type, "structured record");
                let format = self.registry.resolve(content_type)?;
                let document = value.ok_or_else(|| {
                    EventError::Malformed("structured record has no value".to_string())
                })?;
                Ok(format.deserialize(document)?)
            }
            _ => {
                debug!("binary record");
                Ok(decode(headers, value)?)
            }
        }
    }
}

fn is_structured(content_type: &str) -> bool {
    media_type(content_type).starts_with(STRUCTURED_PREFIX)
}
