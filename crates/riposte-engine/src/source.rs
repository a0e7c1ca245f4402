//! Candidate generation boundary.

use async_trait::async_trait;

use riposte_core::types::{CandidateAnswer, LanguageTag};

use crate::error::EngineError;
use crate::similarity::SimilarityScorer;

/// External question-answering capability.
///
/// Implementations return up to `k` candidates ordered by descending
/// confidence, and must tolerate an empty `context` (a no-context request is
/// degraded, not invalid). Latency is unbounded from the engine's point of
/// view; the selector applies its own timeout.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn generate(
        &self,
        question: &str,
        context: &str,
        language: &LanguageTag,
        k: usize,
    ) -> Result<Vec<CandidateAnswer>, EngineError>;
}

/// Deterministic extractive stand-in for a real QA model.
///
/// Ranks the context's sentences by token overlap with the question and
/// returns the top `k` as candidates, with the overlap score as the
/// confidence and the sentence's character offsets as the span. A context
/// with no sentences yields a single low-confidence fallback so interactive
/// use never dead-ends.
#[derive(Debug, Clone, Default)]
pub struct MockCandidateSource {
    scorer: SimilarityScorer,
}

impl MockCandidateSource {
    const FALLBACK_ANSWER: &'static str = "I don't have enough context to answer that.";

    pub fn new() -> Self {
        Self {
            scorer: SimilarityScorer::new(),
        }
    }
}

#[async_trait]
impl CandidateSource for MockCandidateSource {
    async fn generate(
        &self,
        question: &str,
        context: &str,
        _language: &LanguageTag,
        k: usize,
    ) -> Result<Vec<CandidateAnswer>, EngineError> {
        let mut scored: Vec<(f64, usize, usize, String)> = Vec::new();
        let mut char_pos = 0usize;
        for segment in context.split_inclusive(['.', '!', '?']) {
            let segment_chars = segment.chars().count();
            let text = segment.trim();
            if !text.is_empty() {
                let score = self.scorer.score(question, text);
                scored.push((score, char_pos, char_pos + segment_chars, text.to_string()));
            }
            char_pos += segment_chars;
        }

        if scored.is_empty() {
            return Ok(vec![CandidateAnswer::new(Self::FALLBACK_ANSWER, 0.1)]);
        }

        // Stable sort: equal scores keep their order of appearance.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, start, end, text)| {
                CandidateAnswer::new(text, score).with_span(start, end)
            })
            .collect())
    }
}
