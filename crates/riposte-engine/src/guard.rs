//! Repetition detection against recent conversation answers.

use riposte_core::types::CandidateAnswer;

use crate::history::ConversationHistory;
use crate::similarity::SimilarityScorer;

/// Filters candidates that would repeat what the session was recently told.
///
/// A candidate is repetitive iff its maximum similarity against the answers
/// in the last `window_size` exchanges meets or exceeds `threshold`. The
/// guard only filters; when nothing survives, escalation is the selector's
/// job, not the guard's.
#[derive(Debug, Clone)]
pub struct RepetitionGuard {
    scorer: SimilarityScorer,
    window_size: usize,
    threshold: f64,
}

impl RepetitionGuard {
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            scorer: SimilarityScorer::new(),
            window_size,
            threshold,
        }
    }

    /// The candidates that are not repetitive, original order preserved.
    pub fn filter(
        &self,
        candidates: &[CandidateAnswer],
        history: &ConversationHistory,
    ) -> Vec<CandidateAnswer> {
        candidates
            .iter()
            .filter(|candidate| !self.is_repetitive(&candidate.text, history))
            .cloned()
            .collect()
    }

    /// Whether `text` repeats an answer in the window.
    pub fn is_repetitive(&self, text: &str, history: &ConversationHistory) -> bool {
        self.max_similarity(text, history) >= self.threshold
    }

    /// Highest similarity of `text` against the window; 0.0 when the window
    /// is empty.
    pub fn max_similarity(&self, text: &str, history: &ConversationHistory) -> f64 {
        history
            .recent(self.window_size)
            .map(|exchange| self.scorer.score(text, &exchange.answer))
            .fold(0.0, f64::max)
    }

    /// The candidate least similar to the window, for the degrade path.
    ///
    /// Ties go to the earliest-generated candidate. `None` only for an empty
    /// candidate list.
    pub fn least_similar<'a>(
        &self,
        candidates: &'a [CandidateAnswer],
        history: &ConversationHistory,
    ) -> Option<&'a CandidateAnswer> {
        let mut best: Option<(&CandidateAnswer, f64)> = None;
        for candidate in candidates {
            let similarity = self.max_similarity(&candidate.text, history);
            match best {
                Some((_, lowest)) if similarity >= lowest => {}
                _ => best = Some((candidate, similarity)),
            }
        }
        best.map(|(candidate, _)| candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riposte_core::types::{Exchange, LanguageTag};

    fn history_with_answers(answers: &[&str]) -> ConversationHistory {
        let mut history = ConversationHistory::new(10);
        for (i, answer) in answers.iter().enumerate() {
            history.append(Exchange::new(
                format!("q{}", i),
                *answer,
                LanguageTag::default(),
            ));
        }
        history
    }

    fn candidates(texts: &[&str]) -> Vec<CandidateAnswer> {
        texts
            .iter()
            .map(|t| CandidateAnswer::new(*t, 0.9))
            .collect()
    }

    // ---- Filtering ----

    #[test]
    fn test_empty_history_filters_nothing() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = ConversationHistory::new(10);
        let input = candidates(&["anything at all", "something else"]);

        let survivors = guard.filter(&input, &history);
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn test_exact_repeat_is_filtered() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = history_with_answers(&["Paris is the capital of France"]);
        let input = candidates(&["Paris is the capital of France", "The Loire is a river"]);

        let survivors = guard.filter(&input, &history);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].text, "The Loire is a river");
    }

    #[test]
    fn test_filter_preserves_original_order() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = history_with_answers(&["the sky is blue today"]);
        let input = candidates(&[
            "alpha bravo charlie",
            "the sky is blue today",
            "delta echo foxtrot",
        ]);

        let survivors = guard.filter(&input, &history);
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0].text, "alpha bravo charlie");
        assert_eq!(survivors[1].text, "delta echo foxtrot");
    }

    #[test]
    fn test_similarity_at_threshold_is_repetitive() {
        // "a" vs "a b" scores exactly 0.5; at threshold 0.5 it must filter.
        let guard = RepetitionGuard::new(5, 0.5);
        let history = history_with_answers(&["a"]);

        assert!(guard.is_repetitive("a b", &history));
        let survivors = guard.filter(&candidates(&["a b"]), &history);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_similarity_below_threshold_survives() {
        // "a" vs "a b c" scores 1/3, below a 0.5 threshold.
        let guard = RepetitionGuard::new(5, 0.5);
        let history = history_with_answers(&["a"]);

        let survivors = guard.filter(&candidates(&["a b c"]), &history);
        assert_eq!(survivors.len(), 1);
    }

    #[test]
    fn test_only_window_is_checked() {
        let guard = RepetitionGuard::new(2, 0.7);
        let history = history_with_answers(&[
            "oldest answer about volcanoes",
            "middle answer about rivers",
            "latest answer about glaciers",
        ]);

        // Identical to the answer that fell outside the window of 2.
        let survivors = guard.filter(&candidates(&["oldest answer about volcanoes"]), &history);
        assert_eq!(survivors.len(), 1);

        // Identical to one inside the window.
        let survivors = guard.filter(&candidates(&["latest answer about glaciers"]), &history);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_max_similarity_takes_the_worst_case() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = history_with_answers(&["alpha bravo", "one two three four"]);

        // Disjoint from the first answer, identical to the second.
        assert_eq!(guard.max_similarity("one two three four", &history), 1.0);
    }

    // ---- Degrade path ----

    #[test]
    fn test_least_similar_picks_lowest_max_similarity() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = history_with_answers(&["the sky is blue today"]);
        let input = candidates(&[
            "the sky is blue today",      // 1.0
            "the sky is very blue today", // 5/6
            "the sky is blue",            // 4/5
        ]);

        let pick = guard.least_similar(&input, &history).unwrap();
        assert_eq!(pick.text, "the sky is blue");
    }

    #[test]
    fn test_least_similar_tie_goes_to_earliest() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = history_with_answers(&["unrelated words entirely"]);
        // Both candidates are disjoint from history: similarity 0.0 each.
        let input = candidates(&["first clean answer", "second clean answer"]);

        let pick = guard.least_similar(&input, &history).unwrap();
        assert_eq!(pick.text, "first clean answer");
    }

    #[test]
    fn test_least_similar_empty_candidates() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = history_with_answers(&["whatever"]);
        assert!(guard.least_similar(&[], &history).is_none());
    }

    #[test]
    fn test_least_similar_with_empty_history_is_first() {
        let guard = RepetitionGuard::new(5, 0.7);
        let history = ConversationHistory::new(10);
        let input = candidates(&["first", "second"]);

        let pick = guard.least_similar(&input, &history).unwrap();
        assert_eq!(pick.text, "first");
    }
}
