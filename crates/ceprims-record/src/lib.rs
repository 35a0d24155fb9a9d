//! Transport record serialization for events.
//!
//! This is the layer a producer or consumer talks to. Pick an [`Encoding`],
//! hand over an [`Event`](ceprims_event::Event) and a header set, and get the
//! record value back; on the way in, the deserializer detects the encoding
//! from the `content-type` header.
//!
//! Application payloads are decoded through an explicit [`PayloadRegistry`]
//! keyed by event `type`.

pub mod config;
pub mod deserializer;
pub mod error;
pub mod payload;
pub mod serializer;

pub use config::{Encoding, SerializerConfig, ENCODING_CONFIG, EVENT_FORMAT_CONFIG};
pub use deserializer::RecordDeserializer;
pub use error::{RecordError, Result};
pub use payload::{encode_json, PayloadRegistry};
pub use serializer::RecordSerializer;
