//! Structured event formats.
//!
//! A structured format serializes a whole [`Event`](ceprims_event::Event),
//! attributes and payload, into one self-describing document. The JSON
//! format (`application/cloudevents+json`) is built in; additional formats
//! plug into the [`FormatRegistry`] under their own content type so that
//! call sites only need the content-type string.

pub mod config;
pub mod content_type;
pub mod error;
pub mod json;
pub mod registry;

pub use config::JsonFormatConfig;
pub use content_type::{is_json_content_type, media_type};
pub use error::{FormatError, Result};
pub use json::{JsonFormat, BATCH_CONTENT_TYPE, CONTENT_TYPE};
pub use registry::{EventFormat, FormatRegistry};
