//! CloudEvents envelopes with two transport encodings.
//!
//! ceprims wraps opaque application payloads in a standard event envelope
//! and moves it over any transport, either as one structured JSON document
//! or split into `ce_*` headers plus a raw body.
//!
//! # Crate Structure
//!
//! - [`event`]: Envelope model and validated builder
//! - [`format`]: Structured JSON format and the content-type format registry
//! - [`binary`]: Binary-mode mapping onto headers and body
//! - [`record`]: Record serializer/deserializer and payload decoders (behind `record` feature)

/// Re-export event types.
pub mod event {
    pub use ceprims_event::*;
}

/// Re-export structured format types.
pub mod format {
    pub use ceprims_format::*;
}

/// Re-export binary mapping types.
pub mod binary {
    pub use ceprims_binary::*;
}

/// Re-export record types (requires `record` feature).
#[cfg(feature = "record")]
pub mod record {
    pub use ceprims_record::*;
}

pub use ceprims_event::{Event, EventBuilder, EventError, ExtensionValue};
