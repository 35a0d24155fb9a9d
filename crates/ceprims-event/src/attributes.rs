//! Reserved attribute names and the spec version.
//!
//! Every context attribute has a fixed lowercase name shared by all
//! encodings. Extension names live in the same namespace and must never
//! shadow one of these.

use std::fmt;
use std::str::FromStr;

use crate::error::{EventError, Result};

/// Event identifier.
pub const ID: &str = "id";

/// Producing context.
pub const SOURCE: &str = "source";

/// Envelope schema version.
pub const SPECVERSION: &str = "specversion";

/// Logical payload kind.
pub const TYPE: &str = "type";

/// Qualifier of the source.
pub const SUBJECT: &str = "subject";

/// Production timestamp.
pub const TIME: &str = "time";

/// Media type of `data`.
pub const DATACONTENTTYPE: &str = "datacontenttype";

/// Schema that `data` adheres to.
pub const DATASCHEMA: &str = "dataschema";

/// Payload key in structured mode.
pub const DATA: &str = "data";

/// Base64 payload key in structured mode.
pub const DATA_BASE64: &str = "data_base64";

/// Attributes every event must carry.
pub const REQUIRED_ATTRIBUTES: [&str; 4] = [ID, SOURCE, SPECVERSION, TYPE];

/// All names an extension may not use.
pub const RESERVED_ATTRIBUTES: [&str; 10] = [
    ID,
    SOURCE,
    SPECVERSION,
    TYPE,
    SUBJECT,
    TIME,
    DATACONTENTTYPE,
    DATASCHEMA,
    DATA,
    DATA_BASE64,
];

/// Returns true if `name` case-folds to a reserved attribute name.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_ATTRIBUTES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Check an extension attribute name.
///
/// Reserved names are an [`EventError::EncodingConflict`]; anything outside
/// `[a-z0-9]+` is an [`EventError::Validation`].
pub fn validate_extension_name(name: &str) -> Result<()> {
    if is_reserved(name) {
        return Err(EventError::EncodingConflict(format!(
            "extension {name:?} collides with a reserved attribute"
        )));
    }
    if name.is_empty() {
        return Err(EventError::validation(name, "extension name is empty"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return Err(EventError::validation(
            name,
            "extension name must be lowercase ASCII letters and digits",
        ));
    }
    Ok(())
}

/// Recognized envelope schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecVersion {
    #[default]
    V1_0,
}

impl SpecVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecVersion::V1_0 => "1.0",
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecVersion {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1.0" => Ok(SpecVersion::V1_0),
            other => Err(EventError::validation(
                SPECVERSION,
                format!("unrecognized spec version {other:?}"),
            )),
        }
    }
}
