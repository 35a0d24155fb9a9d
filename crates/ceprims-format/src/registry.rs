use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use arc_swap::ArcSwap;
use ceprims_event::Event;
use tracing::debug;

use crate::content_type::media_type;
use crate::error::{FormatError, Result};
use crate::json::JsonFormat;

/// A structured encoding of a whole event into one document.
pub trait EventFormat: Send + Sync {
    /// Content type advertised to transports, e.g. `application/cloudevents+json`.
    fn content_type(&self) -> &str;

    /// Serialize an event into a self-contained document.
    fn serialize(&self, event: &Event) -> Result<Vec<u8>>;

    /// Rebuild an event from a document produced by [`EventFormat::serialize`].
    fn deserialize(&self, bytes: &[u8]) -> Result<Event>;
}

type Bindings = HashMap<String, Arc<dyn EventFormat>>;

/// Content-type keyed registry of event formats.
///
/// Reads are lock-free snapshots; writers are serialized and publish a new
/// table, so a `resolve` that starts after `register` returns sees the
/// new binding.
pub struct FormatRegistry {
    bindings: ArcSwap<Bindings>,
    writer: Mutex<()>,
}

static GLOBAL: OnceLock<FormatRegistry> = OnceLock::new();

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: ArcSwap::from_pointee(HashMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Create a registry holding the built-in formats.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_format(Arc::new(JsonFormat::new()));
        registry
    }

    /// The process-wide registry, initialized with the built-in formats on first use.
    pub fn global() -> &'static FormatRegistry {
        GLOBAL.get_or_init(Self::with_builtin)
    }

    /// Bind a format to a content type, replacing any previous binding.
    pub fn register(&self, tag: &str, format: Arc<dyn EventFormat>) {
        let key = media_type(tag);
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = Bindings::clone(&self.bindings.load());
        let replaced = next.insert(key.clone(), format).is_some();
        self.bindings.store(Arc::new(next));

        debug!(content_type = %key, replaced, "registered event format");
    }

    /// Bind a format under its own content type.
    pub fn register_format(&self, format: Arc<dyn EventFormat>) {
        let tag = format.content_type().to_string();
        self.register(&tag, format);
    }

    /// Look up the format for a content type. Parameters such as `charset` are ignored.
    pub fn resolve(&self, tag: &str) -> Result<Arc<dyn EventFormat>> {
        self.bindings
            .load()
            .get(&media_type(tag))
            .cloned()
            .ok_or_else(|| FormatError::UnsupportedFormat(tag.to_string()))
    }

    /// Check if a content type has a registered format.
    pub fn contains(&self, tag: &str) -> bool {
        self.bindings.load().contains_key(&media_type(tag))
    }

    /// Registered content types, sorted.
    pub fn content_types(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.bindings.load().keys().cloned().collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("content_types", &self.content_types())
            .finish()
    }
}
