/// Errors that can occur while serializing or deserializing records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Event-level error.
    #[error("event error: {0}")]
    Event(#[from] ceprims_event::EventError),

    /// Format-level error.
    #[error("format error: {0}")]
    Format(#[from] ceprims_format::FormatError),

    /// Invalid serializer configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No payload decoder registered for the event type.
    #[error("no payload decoder for event type {0:?}")]
    UnknownType(String),

    /// The event carries no data to decode.
    #[error("event {0} has no data")]
    MissingData(String),

    /// Payload JSON serialization/deserialization error.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecordError>;
