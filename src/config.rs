//! Matcher configuration.

use std::path::{Path, PathBuf};

use crate::error::ValidationError;

/// Default similarity threshold on the 0-100 scale.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 75.0;

/// Default bound on ranked candidates considered per match.
pub const DEFAULT_MAX_MATCHES: usize = 3;

/// Default per-subscriber event buffer capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Default template source directory.
pub const DEFAULT_TEMPLATES_DIR: &str = "data/templates";

/// Tunables for a [`crate::Matcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Directory scanned for `.csv` template sources.
    pub templates_dir: PathBuf,

    /// Minimum fuzzy score for a candidate, 0-100. The keyword strategy
    /// uses 0.7 of this value as its floor.
    pub similarity_threshold: f32,

    /// How many ranked candidates are kept before picking the top one.
    pub max_matches: usize,

    /// Per-subscriber event stream buffer capacity.
    pub event_capacity: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_matches: DEFAULT_MAX_MATCHES,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl MatcherConfig {
    /// Creates a config with defaults and the given source directory.
    #[must_use]
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        Self {
            templates_dir: templates_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Sets the similarity threshold.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Sets the ranked-candidate bound.
    #[must_use]
    pub const fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = max_matches;
        self
    }

    /// Sets the event stream buffer capacity.
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Checks ranges: threshold within 0-100 and a nonzero match bound.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ThresholdOutOfRange` or
    /// `ValidationError::ZeroMaxMatches`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.similarity_threshold.is_nan()
            || !(0.0..=100.0).contains(&self.similarity_threshold)
        {
            return Err(ValidationError::ThresholdOutOfRange {
                value: self.similarity_threshold,
            });
        }
        if self.max_matches == 0 {
            return Err(ValidationError::ZeroMaxMatches);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.similarity_threshold - 75.0).abs() < f32::EPSILON);
        assert_eq!(config.max_matches, 3);
        assert_eq!(config.templates_dir, PathBuf::from("data/templates"));
    }

    #[test]
    fn builder_chain() {
        let config = MatcherConfig::new("/tmp/templates")
            .with_similarity_threshold(60.0)
            .with_max_matches(5)
            .with_event_capacity(16);
        assert!(config.validate().is_ok());
        assert_eq!(config.templates_dir, PathBuf::from("/tmp/templates"));
        assert!((config.similarity_threshold - 60.0).abs() < f32::EPSILON);
        assert_eq!(config.max_matches, 5);
        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let config = MatcherConfig::default().with_similarity_threshold(100.5);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ThresholdOutOfRange { .. })
        ));

        let config = MatcherConfig::default().with_similarity_threshold(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_matches_is_rejected() {
        let config = MatcherConfig::default().with_max_matches(0);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ZeroMaxMatches)
        ));
    }
}
