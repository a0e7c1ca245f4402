//! Textual similarity scoring for repetition detection.

use std::collections::HashSet;

/// Token-overlap similarity scorer.
///
/// Scores two strings by the Jaccard index of their lowercased token sets:
/// symmetric, 1.0 when the sets are identical, 0.0 when the vocabularies are
/// disjoint. Two strings with no tokens at all score 0.0; the empty-union
/// rule takes precedence over reflexivity, which otherwise holds for any
/// input with at least one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Similarity of two strings in [0, 1].
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let tokens_a = tokenize(a);
        let tokens_b = tokenize(b);

        let union = tokens_a.union(&tokens_b).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = tokens_a.intersection(&tokens_b).count();
        intersection as f64 / union as f64
    }
}

/// Lowercased whitespace-delimited token set.
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SimilarityScorer {
        SimilarityScorer::new()
    }

    #[test]
    fn test_identical_strings_score_one() {
        let s = scorer();
        assert_eq!(s.score("Paris is the capital", "Paris is the capital"), 1.0);
    }

    #[test]
    fn test_single_token_reflexive() {
        let s = scorer();
        assert_eq!(s.score("paris", "paris"), 1.0);
    }

    #[test]
    fn test_disjoint_vocabularies_score_zero() {
        let s = scorer();
        assert_eq!(s.score("red green blue", "one two three"), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let s = scorer();
        let a = "the capital of France";
        let b = "France has a large capital";
        assert_eq!(s.score(a, b), s.score(b, a));
    }

    #[test]
    fn test_partial_overlap_known_value() {
        let s = scorer();
        // {the, capital, of, france} vs {the, capital, of, spain}:
        // 3 shared over 5 total.
        assert_eq!(s.score("the capital of France", "the capital of Spain"), 0.6);
    }

    #[test]
    fn test_case_insensitive() {
        let s = scorer();
        assert_eq!(s.score("PARIS", "paris"), 1.0);
        assert_eq!(s.score("The Capital", "the capital"), 1.0);
    }

    #[test]
    fn test_empty_strings_score_zero() {
        let s = scorer();
        assert_eq!(s.score("", ""), 0.0);
        assert_eq!(s.score("", "paris"), 0.0);
        assert_eq!(s.score("paris", ""), 0.0);
    }

    #[test]
    fn test_whitespace_only_scores_zero() {
        let s = scorer();
        assert_eq!(s.score("   ", "  \t "), 0.0);
    }

    #[test]
    fn test_duplicate_tokens_do_not_inflate() {
        let s = scorer();
        // Set semantics: repetition within one string changes nothing.
        assert_eq!(s.score("paris paris paris", "paris"), 1.0);
    }

    #[test]
    fn test_shared_token_added_to_both_never_decreases_score() {
        let s = scorer();
        let before = s.score("red green", "red blue");
        let after = s.score("red green apple", "red blue apple");
        assert!(after >= before);

        let before = s.score("alpha bravo", "charlie delta");
        let after = s.score("alpha bravo echo", "charlie delta echo");
        assert!(after >= before);
    }

    #[test]
    fn test_score_stays_in_range() {
        let s = scorer();
        let pairs = [
            ("what is the capital of France?", "Paris is the capital of France"),
            ("", "anything"),
            ("a b c d e", "c d e f g"),
            ("one", "one two three four five six seven"),
        ];
        for (a, b) in pairs {
            let v = s.score(a, b);
            assert!((0.0..=1.0).contains(&v), "score {} out of range", v);
        }
    }
}
