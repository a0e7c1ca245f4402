//! Request fingerprinting for the response cache.

use riposte_core::types::LanguageTag;
use sha2::{Digest, Sha256};

/// Deterministic cache key for one (question, context, language) identity.
///
/// Session-independent: two sessions asking the same question over
/// the same context share one cache entry. The question is trimmed and
/// lowercased before hashing, so surface differences in casing or padding
/// collapse to the same key; context and language participate verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest the identity of a request.
    ///
    /// Fields are length-delimited before hashing so that content cannot
    /// shift across field boundaries and collide.
    pub fn compute(question: &str, context: &str, language: &LanguageTag) -> Self {
        let question = question.trim().to_lowercase();

        let mut hasher = Sha256::new();
        hasher.update((question.len() as u64).to_le_bytes());
        hasher.update(question.as_bytes());
        hasher.update((context.len() as u64).to_le_bytes());
        hasher.update(context.as_bytes());
        hasher.update(language.as_str().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> LanguageTag {
        LanguageTag::default()
    }

    #[test]
    fn test_deterministic() {
        let a = Fingerprint::compute("What is Rust?", "systems docs", &english());
        let b = Fingerprint::compute("What is Rust?", "systems docs", &english());
        assert_eq!(a, b);
    }

    #[test]
    fn test_question_normalized_before_hashing() {
        let lower = Fingerprint::compute("what is rust?", "docs", &english());
        let shouty = Fingerprint::compute("  WHAT IS RUST?  ", "docs", &english());
        assert_eq!(lower, shouty);
    }

    #[test]
    fn test_differs_on_question() {
        let a = Fingerprint::compute("what is rust?", "docs", &english());
        let b = Fingerprint::compute("what is go?", "docs", &english());
        assert_ne!(a, b);
    }

    #[test]
    fn test_differs_on_context() {
        let a = Fingerprint::compute("what is rust?", "docs v1", &english());
        let b = Fingerprint::compute("what is rust?", "docs v2", &english());
        assert_ne!(a, b);
    }

    #[test]
    fn test_differs_on_language() {
        let a = Fingerprint::compute("what is rust?", "docs", &LanguageTag::new("eng_Latn"));
        let b = Fingerprint::compute("what is rust?", "docs", &LanguageTag::new("spa_Latn"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_boundaries_cannot_shift() {
        // Without length delimiters these two would hash the same bytes.
        let a = Fingerprint::compute("ab", "c", &english());
        let b = Fingerprint::compute("a", "bc", &english());
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_digest_shape() {
        let fp = Fingerprint::compute("q", "c", &english());
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_context_is_a_distinct_identity() {
        let with = Fingerprint::compute("what is rust?", "docs", &english());
        let without = Fingerprint::compute("what is rust?", "", &english());
        assert_ne!(with, without);
    }
}
