//! Template types: stored question/answer pairs with matching metadata.
//!
//! Templates are immutable once created. Their variation set is computed
//! at construction and never recomputed, so a template can be shared
//! freely across generations.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::variation;

/// Source label for templates added at runtime rather than loaded from file.
pub const RUNTIME_SOURCE: &str = "runtime";

/// Category assigned when neither the row nor the caller supplies one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Priority assigned when the row or caller supplies none.
pub const DEFAULT_PRIORITY: i32 = 1;

/// Identifier of a template within one generation of the collection.
///
/// Ids are insertion-order sequence numbers. A reload rebuilds the
/// collection and restarts the sequence; the generation version
/// disambiguates ids across rebuilds.
///
/// # Examples
///
/// ```
/// use tanya::TemplateId;
///
/// let id = TemplateId::new(3);
/// assert_eq!(id.as_usize(), 3);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TemplateId(usize);

impl TemplateId {
    /// Creates a template ID from a sequence number.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the underlying sequence number.
    #[must_use]
    pub const fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored question/answer pair.
///
/// The answer is returned verbatim on a match; the question is the
/// canonical text all three strategies score against.
///
/// # Examples
///
/// ```
/// use tanya::{Template, TemplateId};
///
/// let template = Template::new(TemplateId::new(0), "Apa itu AI?", "Kecerdasan buatan")
///     .unwrap()
///     .with_category("General")
///     .with_priority(2);
/// assert!(template.matches_exactly("apa itu ai"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Insertion-order identity within the collection.
    pub id: TemplateId,

    /// Canonical source text, trimmed.
    pub question: String,

    /// Response text returned verbatim on match.
    pub answer: String,

    /// Free-text grouping label.
    pub category: String,

    /// Higher wins ties; dominates score during ranking.
    pub priority: i32,

    /// Free-text labels; not consulted by ranking.
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Provenance label: source file name or [`RUNTIME_SOURCE`].
    pub source_file: String,

    /// Normalized lexical rewrites of the question, computed once.
    pub variations: BTreeSet<String>,
}

impl Template {
    /// Creates a template with default category, priority, and provenance.
    ///
    /// Question and answer are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyQuestion` or
    /// `ValidationError::EmptyAnswer` when the respective field is blank
    /// after trimming.
    pub fn new(
        id: TemplateId,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let question = question.into().trim().to_string();
        let answer = answer.into().trim().to_string();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        if answer.is_empty() {
            return Err(ValidationError::EmptyAnswer);
        }

        let variations = variation::variations_of(&question);
        Ok(Self {
            id,
            question,
            answer,
            category: DEFAULT_CATEGORY.to_string(),
            priority: DEFAULT_PRIORITY,
            tags: BTreeSet::new(),
            source_file: RUNTIME_SOURCE.to_string(),
            variations,
        })
    }

    /// Sets the category. A blank value keeps the current category, so
    /// empty CSV cells fall through to the file default.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into().trim().to_string();
        if !category.is_empty() {
            self.category = category;
        }
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the tags, trimming each and dropping blanks.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }

    /// Sets the provenance label.
    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    /// Returns true if the folded query equals one of this template's
    /// variations.
    #[must_use]
    pub fn matches_exactly(&self, folded_query: &str) -> bool {
        self.variations.contains(folded_query)
    }
}
