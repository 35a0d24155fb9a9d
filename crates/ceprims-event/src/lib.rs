//! CloudEvents envelope model.
//!
//! An [`Event`] wraps opaque payload bytes with the metadata every consumer
//! needs to route and decode them:
//! - identity and provenance (`id`, `source`)
//! - schema version (`specversion`) and logical kind (`type`)
//! - optional `subject`, `time`, `datacontenttype`, `dataschema`
//! - typed extension attributes
//!
//! Events are built once through [`EventBuilder`] and are read-only afterwards.

pub mod attributes;
pub mod error;
pub mod event;
pub mod extension;

pub use attributes::{
    is_reserved, validate_extension_name, SpecVersion, DATA, DATA_BASE64, DATACONTENTTYPE,
    DATASCHEMA, ID, REQUIRED_ATTRIBUTES, RESERVED_ATTRIBUTES, SOURCE, SPECVERSION, SUBJECT, TIME,
    TYPE,
};
pub use error::{EventError, Result};
pub use event::{format_time, parse_time, Event, EventBuilder};
pub use extension::ExtensionValue;
