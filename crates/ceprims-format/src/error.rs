use ceprims_event::EventError;

/// Errors that can occur in structured formats and the format registry.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// No format is registered for the content type.
    #[error("unsupported event format: {0}")]
    UnsupportedFormat(String),

    /// The event could not be encoded or decoded.
    #[error(transparent)]
    Event(#[from] EventError),
}

pub type Result<T> = std::result::Result<T, FormatError>;
