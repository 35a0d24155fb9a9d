use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use ceprims_event::Event;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RecordError, Result};

type Decoder<T> = Box<dyn Fn(&[u8]) -> Result<T> + Send + Sync>;

/// Maps event `type` strings to payload decoders.
///
/// Consumers register one decoder per type they understand and decode every
/// incoming event through the registry. `T` is usually an application enum
/// covering all known payloads.
pub struct PayloadRegistry<T> {
    decoders: HashMap<String, Decoder<T>>,
}

impl<T: 'static> PayloadRegistry<T> {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a decoder for an event type, replacing any previous one.
    pub fn register<F>(&mut self, ty: impl Into<String>, decoder: F)
    where
        F: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
    {
        self.decoders.insert(ty.into(), Box::new(decoder));
    }

    /// Register a JSON payload type `P` and the mapping into `T`.
    pub fn register_json<P, F>(&mut self, ty: impl Into<String>, map: F)
    where
        P: DeserializeOwned + 'static,
        F: Fn(P) -> T + Send + Sync + 'static,
    {
        self.register(ty, move |bytes| {
            let payload: P = serde_json::from_slice(bytes)?;
            Ok(map(payload))
        });
    }

    /// Decode the payload of `event` with the decoder registered for its type.
    pub fn decode(&self, event: &Event) -> Result<T> {
        let decoder = self
            .decoders
            .get(event.ty())
            .ok_or_else(|| RecordError::UnknownType(event.ty().to_string()))?;
        let data = event
            .data()
            .ok_or_else(|| RecordError::MissingData(event.id().to_string()))?;
        decoder(&data[..])
    }

    pub fn contains(&self, ty: &str) -> bool {
        self.decoders.contains_key(ty)
    }

    /// Registered event types, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl<T: 'static> Default for PayloadRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for PayloadRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadRegistry")
            .field("types", &self.types())
            .finish()
    }
}

/// Serialize an application payload as JSON event data.
pub fn encode_json<P: Serialize>(payload: &P) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(payload)?))
}
