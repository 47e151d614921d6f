//! Generation: one internally consistent snapshot of the template
//! collection, its search index, and its result cache.
//!
//! Every load, reload, and runtime add produces a whole new `Generation`
//! through the same constructor; the matcher then publishes it with a
//! single pointer swap. Readers holding the previous `Arc<Generation>`
//! finish against a coherent snapshot, and every rebuild starts with an
//! empty result cache.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::ResultCache;
use crate::index::SearchIndex;
use crate::template::{Template, TemplateId};

/// One immutable snapshot of the engine's state.
#[derive(Debug)]
pub struct Generation {
    version: u64,
    templates: Vec<Arc<Template>>,
    categories: BTreeSet<String>,
    index: SearchIndex,
    cache: ResultCache,
    last_reload: Option<DateTime<Utc>>,
}

impl Generation {
    /// Builds a snapshot over a collection. Template ids are expected to
    /// equal collection positions; the index and category set are derived
    /// here and the cache starts empty.
    #[must_use]
    pub fn new(
        version: u64,
        templates: Vec<Arc<Template>>,
        last_reload: Option<DateTime<Utc>>,
    ) -> Self {
        let index = SearchIndex::build(templates.iter().map(Arc::as_ref));
        let categories = templates
            .iter()
            .map(|template| template.category.clone())
            .collect();
        Self {
            version,
            templates,
            categories,
            index,
            cache: ResultCache::new(),
            last_reload,
        }
    }

    /// An empty snapshot, the state before any source files are seen.
    #[must_use]
    pub fn empty(version: u64) -> Self {
        Self::new(version, Vec::new(), None)
    }

    /// Monotonic generation number, incremented by every swap.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// All templates in id order.
    #[must_use]
    pub fn templates(&self) -> &[Arc<Template>] {
        &self.templates
    }

    /// Number of templates in this snapshot.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Returns true when the snapshot holds at least one template.
    #[must_use]
    pub fn has_templates(&self) -> bool {
        !self.templates.is_empty()
    }

    /// Sorted distinct category labels.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }

    /// Templates whose category equals `name`, case-insensitively.
    #[must_use]
    pub fn templates_in_category(&self, name: &str) -> Vec<Arc<Template>> {
        let folded = name.trim().to_lowercase();
        self.templates
            .iter()
            .filter(|template| template.category.to_lowercase() == folded)
            .cloned()
            .collect()
    }

    /// The id the next appended template will receive.
    #[must_use]
    pub fn next_template_id(&self) -> TemplateId {
        TemplateId::new(self.templates.len())
    }

    /// The derived search index.
    #[must_use]
    pub const fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// The result cache scoped to this snapshot.
    #[must_use]
    pub const fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// When the template sources were last scanned, if ever.
    #[must_use]
    pub const fn last_reload(&self) -> Option<DateTime<Utc>> {
        self.last_reload
    }
}
