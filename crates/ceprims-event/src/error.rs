/// Errors that can occur while building or decoding an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// A required attribute is missing or an attribute value is invalid.
    #[error("invalid attribute {attribute}: {reason}")]
    Validation {
        attribute: String,
        reason: String,
    },

    /// Decode input is missing required fields or is structurally broken.
    #[error("malformed event: {0}")]
    Malformed(String),

    /// An extension collides with a reserved attribute, or the payload
    /// cannot be carried in the requested position.
    #[error("encoding conflict: {0}")]
    EncodingConflict(String),
}

impl EventError {
    pub(crate) fn validation(attribute: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }

    /// Re-classify a build failure as a decode failure.
    ///
    /// Decoders build events from wire input, so a missing or invalid
    /// attribute there means the input was malformed.
    pub fn into_malformed(self) -> Self {
        match self {
            Self::Validation { attribute, reason } => {
                Self::Malformed(format!("attribute {attribute}: {reason}"))
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, EventError>;
