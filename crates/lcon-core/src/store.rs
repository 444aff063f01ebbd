//! Store — the load-once list of known [`Stream`]s.
//!
//! The store is populated at most once and read many times afterwards. Until
//! it is populated every lookup misses, which callers treat as "title
//! unknown" rather than an error.

use crate::types::Stream;
use tokio::sync::OnceCell;

#[derive(Debug, Default)]
pub struct StreamStore {
    streams: OnceCell<Vec<Stream>>,
}

impl StreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the stream list. Returns `false` (and keeps the first list) if
    /// the store was already populated.
    pub fn populate(&self, streams: Vec<Stream>) -> bool {
        self.streams.set(streams).is_ok()
    }

    pub fn is_loaded(&self) -> bool {
        self.streams.initialized()
    }

    pub fn len(&self) -> usize {
        self.streams.get().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Title of the first stream with `id`, if the store is loaded and knows it.
    pub fn title_of(&self, id: &str) -> Option<&str> {
        self.streams
            .get()?
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.title.as_str())
    }
}
