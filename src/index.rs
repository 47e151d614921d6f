//! Inverted index over template variations and question keywords.
//!
//! The index is a derived structure rebuilt with every generation and
//! exposed for inspection. It is not consulted to narrow candidates
//! before scoring; match scoring scans the whole collection so no
//! eligible template can be pruned away.

use std::collections::HashMap;

use crate::template::{Template, TemplateId};

/// Minimum keyword length, in characters, for index inclusion.
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Mapping from normalized key (a variation string or a question keyword)
/// to the templates containing it, in insertion order.
///
/// A template may appear in many buckets, and more than once in a single
/// bucket when a variation and a keyword normalize identically. Matching
/// deduplicates by [`TemplateId`], so the duplication is tolerated here.
#[derive(Debug, Default)]
pub struct SearchIndex {
    buckets: HashMap<String, Vec<TemplateId>>,
}

impl SearchIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index over a collection of templates.
    #[must_use]
    pub fn build<'a>(templates: impl IntoIterator<Item = &'a Template>) -> Self {
        let mut index = Self::new();
        for template in templates {
            index.insert_template(template);
        }
        index
    }

    /// Adds one template's variations and keywords to the index.
    pub fn insert_template(&mut self, template: &Template) {
        for variation in &template.variations {
            self.buckets
                .entry(variation.clone())
                .or_default()
                .push(template.id);
        }

        for word in template.question.split_whitespace() {
            if word.chars().count() >= MIN_KEYWORD_CHARS {
                self.buckets
                    .entry(word.to_lowercase())
                    .or_default()
                    .push(template.id);
            }
        }
    }

    /// Templates bucketed under a key, in insertion order. Unknown keys
    /// yield an empty slice.
    #[must_use]
    pub fn templates_for(&self, key: &str) -> &[TemplateId] {
        self.buckets.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total bucket entries, duplicates included.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Returns true when no template has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: usize, question: &str) -> Template {
        Template::new(TemplateId::new(id), question, "answer").unwrap()
    }

    #[test]
    fn index_buckets_variations() {
        let t = template(0, "Jam berapa buka?");
        let index = SearchIndex::build([&t]);
        assert_eq!(index.templates_for("jam berapa buka"), &[TemplateId::new(0)]);
        assert_eq!(index.templates_for("jam berapa buka?"), &[TemplateId::new(0)]);
    }

    #[test]
    fn index_buckets_keywords_case_folded() {
        let t = template(0, "Dimana Lokasi Kantor?");
        let index = SearchIndex::build([&t]);
        assert_eq!(index.templates_for("lokasi"), &[TemplateId::new(0)]);
        // raw keyword "Kantor?" folds but keeps its punctuation
        assert_eq!(index.templates_for("kantor?"), &[TemplateId::new(0)]);
    }

    #[test]
    fn index_skips_short_keywords() {
        let t = template(0, "di ab kantor");
        let index = SearchIndex::build([&t]);
        assert!(index.templates_for("di").is_empty());
        assert!(index.templates_for("ab").is_empty());
        assert_eq!(index.templates_for("kantor"), &[TemplateId::new(0)]);
    }

    #[test]
    fn index_tolerates_duplicate_entries_in_one_bucket() {
        // "buka" is both the base variation and a keyword of this question.
        let t = template(0, "buka");
        let index = SearchIndex::build([&t]);
        assert_eq!(
            index.templates_for("buka"),
            &[TemplateId::new(0), TemplateId::new(0)]
        );
    }

    #[test]
    fn index_preserves_insertion_order_across_templates() {
        let first = template(0, "jam buka kantor");
        let second = template(1, "kantor tutup jam");
        let index = SearchIndex::build([&first, &second]);
        assert_eq!(
            index.templates_for("kantor"),
            &[TemplateId::new(0), TemplateId::new(1)]
        );
    }

    #[test]
    fn index_counts() {
        let t = template(0, "Jam berapa buka?");
        let index = SearchIndex::build([&t]);
        assert!(!index.is_empty());
        assert!(index.key_count() > 0);
        assert!(index.entry_count() >= index.key_count());

        let empty = SearchIndex::new();
        assert!(empty.is_empty());
        assert_eq!(empty.entry_count(), 0);
    }
}
