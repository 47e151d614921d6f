//! Per-generation result cache.
//!
//! Memoizes query to answer for repeated identical queries. Keys are the
//! entire folded query string, not a variation rewrite: the whole query
//! is the key, so near-rephrasings each get their own entry.
//!
//! The cache dies with its generation; reload and runtime adds start
//! from an empty one.

use std::collections::HashMap;
use std::sync::RwLock;

/// Query-to-answer memo scoped to one generation.
///
/// Lock poisoning degrades to a miss on read and a dropped write on
/// insert; lookups then recompute.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<String, String>>,
}

impl ResultCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached answer for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        entries.get(key).cloned()
    }

    /// Records an answer under a key.
    pub fn insert(&self, key: String, answer: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, answer);
        }
    }

    /// Number of cached answers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
