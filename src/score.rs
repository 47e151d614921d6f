//! Match score and strategy method types.
//!
//! Scores in tanya live on a 0-100 scale shared by all three strategies,
//! so exact hits (100) always dominate fuzzy and keyword hits when merged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// A template variation equals the case-folded query.
    Exact,

    /// Partial-ratio string similarity over the raw question text.
    Fuzzy,

    /// Jaccard overlap between query and question word sets.
    Keyword,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::Keyword => write!(f, "keyword"),
        }
    }
}

/// A match score on the shared 0-100 scale.
///
/// # Examples
///
/// ```
/// use tanya::Score;
///
/// let score = Score::new(82.5).unwrap();
/// assert!(score.meets(75.0));
/// assert!(!score.is_exact());
/// assert!(Score::exact().is_exact());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score {
    value: f32,
}

impl Score {
    /// Minimum valid score value.
    pub const MIN_VALUE: f32 = 0.0;

    /// Maximum valid score value.
    pub const MAX_VALUE: f32 = 100.0;

    /// Creates a new score with validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ScoreOutOfRange` if the value is NaN or
    /// not in [0.0, 100.0].
    pub fn new(value: f32) -> Result<Self, ValidationError> {
        if value.is_nan() || !(Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value) {
            return Err(ValidationError::ScoreOutOfRange { value });
        }
        Ok(Self { value })
    }

    /// Creates a score from a computed similarity ratio, clamping floating
    /// point spill into the valid range. NaN clamps to zero.
    #[must_use]
    pub fn from_ratio(value: f32) -> Self {
        if value.is_nan() {
            return Self {
                value: Self::MIN_VALUE,
            };
        }
        Self {
            value: value.clamp(Self::MIN_VALUE, Self::MAX_VALUE),
        }
    }

    /// The score assigned to exact variation matches.
    #[must_use]
    pub const fn exact() -> Self {
        Self {
            value: Self::MAX_VALUE,
        }
    }

    /// A zero score.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            value: Self::MIN_VALUE,
        }
    }

    /// The raw score value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Returns true if the score clears the given floor.
    #[must_use]
    pub fn meets(&self, floor: f32) -> bool {
        self.value >= floor
    }

    /// Returns true for the exact-match score.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.value >= Self::MAX_VALUE
    }

    /// Total ordering over score values, for ranking.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.total_cmp(&other.value)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value)
    }
}
