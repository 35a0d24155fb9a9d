use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ceprims_format::CONTENT_TYPE;

use crate::error::{RecordError, Result};

/// Config key selecting the [`Encoding`].
pub const ENCODING_CONFIG: &str = "cloudevents.serializer.encoding";

/// Config key selecting the structured event format by content type.
pub const EVENT_FORMAT_CONFIG: &str = "cloudevents.serializer.event_format";

/// How an event is laid out on a transport record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One document in the record value, `content-type` names the format.
    Structured,
    /// Attributes in `ce_` headers, payload in the record value.
    #[default]
    Binary,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Structured => f.write_str("STRUCTURED"),
            Encoding::Binary => f.write_str("BINARY"),
        }
    }
}

impl FromStr for Encoding {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRUCTURED" => Ok(Encoding::Structured),
            "BINARY" => Ok(Encoding::Binary),
            other => Err(RecordError::Config(format!(
                "unknown encoding {other:?} (expected STRUCTURED or BINARY)"
            ))),
        }
    }
}

/// Controls record serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerConfig {
    /// Record layout.
    pub encoding: Encoding,
    /// Content type of the structured format used in [`Encoding::Structured`].
    pub event_format: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Binary,
            event_format: CONTENT_TYPE.to_string(),
        }
    }
}

impl SerializerConfig {
    /// Read a Kafka-style string config map. Missing keys keep their defaults.
    pub fn from_map(configs: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(encoding) = configs.get(ENCODING_CONFIG) {
            config.encoding = encoding.parse()?;
        }
        if let Some(format) = configs.get(EVENT_FORMAT_CONFIG) {
            if format.trim().is_empty() {
                return Err(RecordError::Config(format!(
                    "{EVENT_FORMAT_CONFIG} must not be empty"
                )));
            }
            config.event_format = format.clone();
        }
        Ok(config)
    }
}
