//! String similarity primitives for the fuzzy and keyword strategies.
//!
//! Both scorers report on the shared 0-100 scale. `partial_ratio` is
//! substring-tolerant: a short query aligned against any equal-length
//! window of a longer question scores as if the lengths matched, so
//! "buka" still scores 100 against "jam berapa buka hari ini".

use std::collections::HashSet;

/// Best normalized Levenshtein similarity between the shorter input and any
/// equal-length character window of the longer input, scaled to 0-100.
///
/// Operates on the raw strings; case folding is the caller's concern.
/// Two empty strings score 100, one empty string scores 0.
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> f32 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (short, short_len, long, long_len) = if a_len <= b_len {
        (a, a_len, b, b_len)
    } else {
        (b, b_len, a, a_len)
    };

    if short_len == 0 {
        return if long_len == 0 { 100.0 } else { 0.0 };
    }
    if short_len == long_len {
        return ratio_to_score(strsim::normalized_levenshtein(short, long));
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0_f64;
    for start in 0..=(long_len - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let sim = strsim::normalized_levenshtein(short, &window);
        if sim > best {
            best = sim;
            if best >= 1.0 {
                break;
            }
        }
    }
    ratio_to_score(best)
}

/// Jaccard overlap between the word sets of two strings, scaled to 0-100.
///
/// Inputs are case-folded and whitespace-split; tokens are stripped of
/// leading/trailing punctuation so "kantor?" and "kantor" count as the
/// same word. An empty union scores 0.
#[must_use]
pub fn keyword_overlap(a: &str, b: &str) -> f32 {
    let a_words = token_set(a);
    let b_words = token_set(b);

    let union = a_words.union(&b_words).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a_words.intersection(&b_words).count();

    #[allow(clippy::cast_precision_loss)]
    let score = (intersection as f32 / union as f32) * 100.0;
    score
}

/// Case-folded word set of a string, with edge punctuation stripped per
/// token. Tokens that are pure punctuation are dropped.
#[must_use]
pub fn token_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

fn ratio_to_score(ratio: f64) -> f32 {
    #[allow(clippy::cast_possible_truncation)]
    let score = (ratio * 100.0) as f32;
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ratio_identical_strings() {
        assert!((partial_ratio("jam berapa buka", "jam berapa buka") - 100.0).abs() < 0.001);
    }

    #[test]
    fn partial_ratio_substring_scores_full() {
        assert!((partial_ratio("buka", "jam berapa buka hari ini") - 100.0).abs() < 0.001);
        assert!((partial_ratio("jam berapa buka hari ini", "buka") - 100.0).abs() < 0.001);
    }

    #[test]
    fn partial_ratio_empty_inputs() {
        assert!((partial_ratio("", "") - 100.0).abs() < 0.001);
        assert!((partial_ratio("", "jam") - 0.0).abs() < 0.001);
        assert!((partial_ratio("jam", "") - 0.0).abs() < 0.001);
    }

    #[test]
    fn partial_ratio_disjoint_strings_score_low() {
        assert!(partial_ratio("xyzzy", "jam berapa buka") < 50.0);
    }

    #[test]
    fn partial_ratio_is_symmetric() {
        let forward = partial_ratio("lokasi kantor", "Dimana lokasi kantor pusat?");
        let backward = partial_ratio("Dimana lokasi kantor pusat?", "lokasi kantor");
        assert!((forward - backward).abs() < 0.001);
    }

    #[test]
    fn partial_ratio_near_miss_scores_high_but_below_full() {
        let score = partial_ratio("jam berapa byka", "jam berapa buka");
        assert!(score > 85.0);
        assert!(score < 100.0);
    }

    #[test]
    fn keyword_overlap_identical_word_sets() {
        assert!((keyword_overlap("lokasi kantor dimana", "dimana lokasi kantor") - 100.0).abs() < 0.001);
    }

    #[test]
    fn keyword_overlap_ignores_edge_punctuation_and_case() {
        // "kantor?" must count as "kantor" or reordered queries lose the word.
        let score = keyword_overlap("lokasi kantor dimana", "Dimana lokasi kantor?");
        assert!((score - 100.0).abs() < 0.001);
    }

    #[test]
    fn keyword_overlap_partial() {
        // {jam, buka} vs {jam, buka, berapa}: 2 of 3.
        let score = keyword_overlap("jam buka", "jam berapa buka");
        assert!((score - 66.666_67).abs() < 0.01);
    }

    #[test]
    fn keyword_overlap_disjoint_and_empty() {
        assert!((keyword_overlap("alpha beta", "gamma delta") - 0.0).abs() < 0.001);
        assert!((keyword_overlap("", "") - 0.0).abs() < 0.001);
        assert!((keyword_overlap("?!", "...") - 0.0).abs() < 0.001);
    }

    #[test]
    fn token_set_strips_punctuation_and_folds_case() {
        let tokens = token_set("Dimana lokasi KANTOR?");
        assert!(tokens.contains("dimana"));
        assert!(tokens.contains("lokasi"));
        assert!(tokens.contains("kantor"));
        assert_eq!(tokens.len(), 3);
    }
}
