use std::sync::Arc;

use bytes::Bytes;
use ceprims_binary::{encode, Headers, CONTENT_TYPE_HEADER};
use ceprims_event::Event;
use ceprims_format::{EventFormat, FormatRegistry};
use tracing::trace;

use crate::config::{Encoding, SerializerConfig};
use crate::error::Result;

/// Turns events into record headers and value.
#[derive(Clone)]
pub struct RecordSerializer {
    encoding: Encoding,
    format: Arc<dyn EventFormat>,
}

impl RecordSerializer {
    /// Create a serializer, resolving the event format from the global registry.
    pub fn new(config: SerializerConfig) -> Result<Self> {
        Self::with_registry(config, FormatRegistry::global())
    }

    /// Create a serializer, resolving the event format from `registry`.
    pub fn with_registry(config: SerializerConfig, registry: &FormatRegistry) -> Result<Self> {
        let format = registry.resolve(&config.event_format)?;
        Ok(Self::with_format(config.encoding, format))
    }

    /// Create a serializer with an explicit format instance.
    pub fn with_format(encoding: Encoding, format: Arc<dyn EventFormat>) -> Self {
        Self { encoding, format }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Content type of the structured format.
    pub fn format_content_type(&self) -> &str {
        self.format.content_type()
    }

    /// Serialize `event`, writing its headers into `headers`, and return the record value.
    ///
    /// Structured mode sets `content-type` to the format content type and
    /// returns the document. Binary mode adds the `ce_` headers and returns
    /// the raw payload, `None` when the event has no data.
    pub fn serialize(&self, event: &Event, headers: &mut Headers) -> Result<Option<Bytes>> {
        trace!(encoding = %self.encoding, id = event.id(), "serializing event");
        match self.encoding {
            Encoding::Structured => {
                let document = self.format.serialize(event)?;
                headers.insert(CONTENT_TYPE_HEADER, self.format.content_type().to_string());
                Ok(Some(Bytes::from(document)))
            }
            Encoding::Binary => {
                let message = encode(event);
                // A stale content-type would misroute the record on decode.
                headers.remove(CONTENT_TYPE_HEADER);
                headers.extend_from(&message.headers);
                Ok(message.body)
            }
        }
    }
}

impl std::fmt::Debug for RecordSerializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSerializer")
            .field("encoding", &self.encoding)
            .field("format", &self.format.content_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use ceprims_format::{FormatError, JsonFormat, CONTENT_TYPE};

    use super::*;
    use crate::error::RecordError;

    fn address_changed() -> Event {
        Event::builder()
            .id("e1")
            .source("/people/p1")
            .ty("AddressChanged")
            .subject("address")
            .data_with_content_type("application/json", &br#"{"zip":"10001"}"#[..])
            .extension("anumber", 10)
            .build()
            .unwrap()
    }

    #[test]
    fn structured_sets_content_type() {
        let serializer = RecordSerializer::new(SerializerConfig {
            encoding: Encoding::Structured,
            ..SerializerConfig::default()
        })
        .unwrap();

        let mut headers = Headers::new();
        let value = serializer
            .serialize(&address_changed(), &mut headers)
            .unwrap()
            .unwrap();

        assert_eq!(headers.get_str(CONTENT_TYPE_HEADER), Some(CONTENT_TYPE));
        assert_eq!(headers.len(), 1);
        let doc: serde_json::Value = serde_json::from_slice(&value).unwrap();
        assert_eq!(doc["data"]["zip"], "10001");
        assert_eq!(doc["anumber"], 10);
    }

    #[test]
    fn binary_keeps_transport_headers() {
        let serializer = RecordSerializer::new(SerializerConfig::default()).unwrap();
        assert_eq!(serializer.encoding(), Encoding::Binary);

        let mut headers: Headers = [("traceparent", "00-abc")].into_iter().collect();
        let value = serializer
            .serialize(&address_changed(), &mut headers)
            .unwrap();

        assert_eq!(value.unwrap().as_ref(), br#"{"zip":"10001"}"#);
        assert_eq!(headers.get_str("traceparent"), Some("00-abc"));
        assert_eq!(headers.get_str("ce_id"), Some("e1"));
        assert_eq!(headers.get_str("ce_anumber"), Some("10"));
        assert_eq!(headers.get_str(CONTENT_TYPE_HEADER), Some("application/json"));
    }

    #[test]
    fn binary_clears_stale_content_type() {
        let serializer = RecordSerializer::new(SerializerConfig::default()).unwrap();
        let event = Event::builder()
            .id("e2")
            .source("/people/p1")
            .ty("Deleted")
            .build()
            .unwrap();

        let mut headers: Headers = [(CONTENT_TYPE_HEADER, CONTENT_TYPE)].into_iter().collect();
        let value = serializer.serialize(&event, &mut headers).unwrap();

        assert!(value.is_none());
        assert!(headers.get(CONTENT_TYPE_HEADER).is_none());
        let decoded = crate::deserializer::RecordDeserializer::new()
            .deserialize(&headers, None)
            .unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn unknown_event_format_fails() {
        let result = RecordSerializer::with_registry(
            SerializerConfig {
                encoding: Encoding::Structured,
                event_format: "application/cloudevents+avro".to_string(),
            },
            &FormatRegistry::with_builtin(),
        );
        assert!(matches!(
            result,
            Err(RecordError::Format(FormatError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn explicit_format_instance_is_used() {
        let serializer = RecordSerializer::with_format(
            Encoding::Structured,
            Arc::new(JsonFormat::with_force_data_base64()),
        );
        let mut headers = Headers::new();
        let value = serializer
            .serialize(&address_changed(), &mut headers)
            .unwrap()
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&value).unwrap();
        assert!(doc["data_base64"].is_string());
    }
}
