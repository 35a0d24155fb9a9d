use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::attributes::{validate_extension_name, SpecVersion, ID, SOURCE, SPECVERSION, TIME, TYPE};
use crate::error::{EventError, Result};
use crate::extension::ExtensionValue;

/// A CloudEvents envelope.
///
/// Construct with [`Event::builder`]. All attributes are read-only once built;
/// use [`Event::to_builder`] to derive a modified copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: String,
    source: String,
    spec_version: SpecVersion,
    ty: String,
    subject: Option<String>,
    time: Option<DateTime<FixedOffset>>,
    data_content_type: Option<String>,
    data_schema: Option<String>,
    extensions: BTreeMap<String, ExtensionValue>,
    data: Option<Bytes>,
}

impl Event {
    /// Start a builder with `specversion` preset to 1.0.
    pub fn builder() -> EventBuilder {
        EventBuilder::v1()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn time(&self) -> Option<&DateTime<FixedOffset>> {
        self.time.as_ref()
    }

    pub fn data_content_type(&self) -> Option<&str> {
        self.data_content_type.as_deref()
    }

    pub fn data_schema(&self) -> Option<&str> {
        self.data_schema.as_deref()
    }

    pub fn extensions(&self) -> &BTreeMap<String, ExtensionValue> {
        &self.extensions
    }

    pub fn extension(&self, name: &str) -> Option<&ExtensionValue> {
        self.extensions.get(name)
    }

    /// Payload bytes, encoded per `datacontenttype`.
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Copy this event into a builder.
    pub fn to_builder(&self) -> EventBuilder {
        EventBuilder {
            id: Some(self.id.clone()),
            source: Some(self.source.clone()),
            spec_version: Some(self.spec_version.as_str().to_string()),
            ty: Some(self.ty.clone()),
            subject: self.subject.clone(),
            time: self.time,
            data_content_type: self.data_content_type.clone(),
            data_schema: self.data_schema.clone(),
            extensions: self
                .extensions
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            data: self.data.clone(),
        }
    }
}

/// Accumulates attributes in any order; [`EventBuilder::build`] validates.
#[derive(Debug, Clone, Default)]
pub struct EventBuilder {
    id: Option<String>,
    source: Option<String>,
    spec_version: Option<String>,
    ty: Option<String>,
    subject: Option<String>,
    time: Option<DateTime<FixedOffset>>,
    data_content_type: Option<String>,
    data_schema: Option<String>,
    extensions: Vec<(String, ExtensionValue)>,
    data: Option<Bytes>,
}

impl EventBuilder {
    /// Create an empty builder. `specversion` must be set before `build`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for spec version 1.0.
    pub fn v1() -> Self {
        Self::new().spec_version(SpecVersion::V1_0)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn spec_version(mut self, version: SpecVersion) -> Self {
        self.spec_version = Some(version.as_str().to_string());
        self
    }

    /// Set the spec version from its wire text. Unknown values fail at `build`.
    pub fn spec_version_str(mut self, version: impl Into<String>) -> Self {
        self.spec_version = Some(version.into());
        self
    }

    pub fn ty(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn time(mut self, time: DateTime<FixedOffset>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn data_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.data_content_type = Some(content_type.into());
        self
    }

    pub fn data_schema(mut self, schema: impl Into<String>) -> Self {
        self.data_schema = Some(schema.into());
        self
    }

    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn data_with_content_type(
        self,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.data_content_type(content_type).data(data)
    }

    /// Add an extension attribute. A later value for the same name wins.
    pub fn extension(mut self, name: impl Into<String>, value: impl Into<ExtensionValue>) -> Self {
        self.extensions.push((name.into(), value.into()));
        self
    }

    /// Validate and finish the event.
    pub fn build(self) -> Result<Event> {
        let id = required(ID, self.id)?;
        let source = required(SOURCE, self.source)?;
        let spec_version = required(SPECVERSION, self.spec_version)?.parse::<SpecVersion>()?;
        let ty = required(TYPE, self.ty)?;

        let mut extensions = BTreeMap::new();
        for (name, value) in self.extensions {
            validate_extension_name(&name)?;
            extensions.insert(name, value);
        }

        Ok(Event {
            id,
            source,
            spec_version,
            ty,
            subject: self.subject,
            time: self.time,
            data_content_type: self.data_content_type,
            data_schema: self.data_schema,
            extensions,
            data: self.data,
        })
    }
}

fn required(attribute: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(EventError::validation(attribute, "must not be empty")),
        None => Err(EventError::validation(attribute, "missing required attribute")),
    }
}

/// Render a timestamp the way every encoding carries it (RFC 3339).
pub fn format_time(time: &DateTime<FixedOffset>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an RFC 3339 timestamp with offset.
pub fn parse_time(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .map_err(|err| EventError::validation(TIME, format!("invalid RFC 3339 timestamp: {err}")))
}
