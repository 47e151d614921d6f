//! # Tanya - Template Matching for Canned Answers
//!
//! Tanya routes free-form user utterances to pre-authored answers. A
//! template collection is loaded from CSV files, indexed in memory, and
//! queried through three complementary strategies whose results are
//! merged and ranked.
//!
//! ## Core Concepts
//!
//! - **Template**: A question/answer pair with category, priority, and
//!   pre-computed phrasing variations
//! - **Generation**: An immutable snapshot of the collection, its index,
//!   and its result cache, replaced wholesale on reload
//! - **Strategies**: Exact variation lookup, fuzzy partial-ratio
//!   similarity, and keyword overlap, merged per template
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tanya::{Matcher, MatcherConfig};
//!
//! let matcher = Matcher::new(
//!     MatcherConfig::new("data/templates").with_similarity_threshold(80.0),
//! )?;
//!
//! // Resolve a query to its best answer
//! if let Some(answer) = matcher.find_match("jam berapa buka") {
//!     println!("{answer}");
//! }
//!
//! // Append a template at runtime
//! matcher.add_template("Apa itu AI?", "Kecerdasan buatan", "General", 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod config;
pub mod error;
pub mod score;
pub mod template;
pub mod variation;

// Collection state
pub mod cache;
pub mod generation;
pub mod index;
pub mod loader;

// Matching and observation
pub mod event;
pub mod matcher;
pub mod similarity;

// Re-export primary types at crate root for convenience
pub use cache::ResultCache;
pub use config::MatcherConfig;
pub use error::{LoadError, TanyaError, TanyaResult, ValidationError};
pub use event::{EventBus, EventStream, MatchEvent, SubscriberId};
pub use generation::Generation;
pub use index::SearchIndex;
pub use loader::{LoadReport, RowIssue, SkippedRow};
pub use matcher::{EngineStatus, Matcher, SearchHit, DEFAULT_SEARCH_LIMIT};
pub use score::{MatchMethod, Score};
pub use template::{Template, TemplateId};
