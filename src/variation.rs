//! Lexical variation generation for template questions.
//!
//! Variations exist to catch trivial rephrasing ("apa itu X" vs "itu X"
//! vs "X") with a handful of cheap rewrites. This is not stemming and not
//! tokenization; every rule works on the case-folded question as a whole.

use std::collections::BTreeSet;

/// Trailing punctuation stripped to form a variation.
pub const TRAILING_PUNCTUATION: [char; 3] = ['?', '.', '!'];

/// Interrogative prefixes toggled to form variations.
///
/// Indonesian first, then their English counterparts. Each prefix yields
/// exactly one variant: stripped when the question starts with it,
/// prepended otherwise.
pub const QUESTION_PREFIXES: [&str; 12] = [
    "apa",
    "bagaimana",
    "mengapa",
    "dimana",
    "kapan",
    "siapa",
    "what",
    "how",
    "why",
    "where",
    "when",
    "who",
];

/// Case-folds and trims a string to the form variations are generated
/// from and compared against.
#[must_use]
pub fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Generates the variation set for a question.
///
/// The set contains the folded base form, the base with one trailing
/// punctuation mark removed (when present), and one variant per
/// interrogative prefix (stripped or prepended).
#[must_use]
pub fn variations_of(question: &str) -> BTreeSet<String> {
    let mut variations = BTreeSet::new();
    let base = fold(question);

    for punct in TRAILING_PUNCTUATION {
        if let Some(stripped) = base.strip_suffix(punct) {
            variations.insert(stripped.trim().to_string());
        }
    }

    for prefix in QUESTION_PREFIXES {
        if let Some(rest) = base.strip_prefix(prefix) {
            variations.insert(rest.trim().to_string());
        } else {
            variations.insert(format!("{prefix} {base}"));
        }
    }

    variations.insert(base);
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_trims_and_lowercases() {
        assert_eq!(fold("  Apa Itu AI?  "), "apa itu ai?");
        assert_eq!(fold("JAM BERAPA"), "jam berapa");
    }

    #[test]
    fn variations_contain_folded_base() {
        let vars = variations_of("  Jam Berapa Buka?  ");
        assert!(vars.contains("jam berapa buka?"));
    }

    #[test]
    fn variations_strip_trailing_punctuation() {
        assert!(variations_of("Jam berapa buka?").contains("jam berapa buka"));
        assert!(variations_of("Kantor tutup.").contains("kantor tutup"));
        assert!(variations_of("Buka sekarang!").contains("buka sekarang"));
    }

    #[test]
    fn variations_without_punctuation_have_no_stripped_form() {
        let vars = variations_of("jam berapa buka");
        // base + 12 prefix variants, nothing else
        assert_eq!(vars.len(), 13);
    }

    #[test]
    fn variations_strip_matching_prefix() {
        let vars = variations_of("Apa itu AI?");
        assert!(vars.contains("itu ai?"));
    }

    #[test]
    fn variations_prepend_missing_prefixes() {
        let vars = variations_of("Jam berapa buka?");
        assert!(vars.contains("apa jam berapa buka?"));
        assert!(vars.contains("what jam berapa buka?"));
        assert!(vars.contains("dimana jam berapa buka?"));
    }

    #[test]
    fn every_prefix_yields_exactly_one_variant() {
        // "Jam berapa buka?" starts with no prefix: base + punctuation
        // strip + 12 prepends.
        let vars = variations_of("Jam berapa buka?");
        assert_eq!(vars.len(), 14);
    }

    #[test]
    fn prefix_strip_can_produce_empty_variant() {
        // The whole question being a prefix leaves the empty rewrite.
        // Harmless downstream: empty queries never reach exact compare.
        let vars = variations_of("Apa");
        assert!(vars.contains(""));
    }

    #[test]
    fn variations_are_deterministic_across_input_spacing() {
        assert_eq!(
            variations_of("  APA ITU AI?  "),
            variations_of("apa itu ai?")
        );
    }

    #[test]
    fn variations_cover_the_rephrasing_chain() {
        // "apa itu ai?" should be reachable from all three phrasings.
        let vars = variations_of("Apa itu AI?");
        assert!(vars.contains("apa itu ai?"));
        assert!(vars.contains("apa itu ai"));
        assert!(vars.contains("itu ai?"));
    }
}
