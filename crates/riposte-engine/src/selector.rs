//! Answer selection: the end-to-end "answer a question" operation.
//!
//! Composes the response cache, per-session conversation history, repetition
//! guard, and candidate source. Selection runs in three stages (primary pass,
//! diverse escalation, least-similar degrade) so that repetition alone never
//! fails a request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use riposte_core::config::RiposteConfig;
use riposte_core::types::{AnswerResult, CandidateAnswer, Exchange, LanguageTag, SessionId};

use crate::cache::{CacheEntry, ResponseCache};
use crate::error::EngineError;
use crate::fingerprint::Fingerprint;
use crate::guard::RepetitionGuard;
use crate::history::ConversationHistory;
use crate::source::CandidateSource;

/// Central selector wiring cache, histories, guard, and source together.
///
/// Two ownership domains, deliberately separate: the response cache is
/// process-wide and keyed by request identity, the history map is keyed by
/// session identity and never shared across sessions. Locks are held only
/// for in-memory work, never across the candidate-source call; exchanges are
/// appended in the order requests reach the recording step, which under
/// concurrent same-session use may differ from arrival order.
pub struct AnswerSelector {
    source: Arc<dyn CandidateSource>,
    cache: ResponseCache,
    guard: RepetitionGuard,
    histories: Mutex<HashMap<SessionId, ConversationHistory>>,
    config: RiposteConfig,
}

impl AnswerSelector {
    /// Create a selector from configuration and a candidate source.
    ///
    /// Fails fast on a misconfigured cache capacity, before any traffic.
    pub fn new(
        config: RiposteConfig,
        source: Arc<dyn CandidateSource>,
    ) -> Result<Self, EngineError> {
        let cache = ResponseCache::new(config.cache.capacity)?;
        let guard = RepetitionGuard::new(
            config.repetition.history_window,
            config.repetition.similarity_threshold,
        );
        Ok(Self {
            source,
            cache,
            guard,
            histories: Mutex::new(HashMap::new()),
            config,
        })
    }

    /// Answer a question against a knowledge context within a session.
    ///
    /// Unknown session ids start a fresh session silently. An empty context
    /// proceeds with degraded quality; an empty question is rejected. On a
    /// generation failure nothing is written to cache or history.
    pub async fn answer(
        &self,
        question: &str,
        context: &str,
        language: LanguageTag,
        session: &SessionId,
    ) -> Result<AnswerResult, EngineError> {
        if question.trim().is_empty() {
            return Err(EngineError::EmptyQuestion);
        }

        // Step 1: fingerprint the request identity and probe the cache.
        let fingerprint = Fingerprint::compute(question, context, &language);

        // Step 2: a hit must still survive this session's repetition check.
        // On failure, fall through as a miss; the entry is not evicted and
        // stays valid for other sessions.
        if let Some(entry) = self.cache.get(&fingerprint) {
            if !self.cached_answer_repetitive(&entry.answer, session)? {
                self.record_exchange(session, question, &entry.answer, &language)?;
                self.cache.put(fingerprint, entry.clone())?;
                info!(session = %session, from_cache = true, "answer served from cache");
                return Ok(AnswerResult {
                    text: entry.answer,
                    from_cache: true,
                });
            }
            debug!(
                session = %session,
                "cached answer repetitive for this session, regenerating"
            );
        }

        // Step 3: primary generation pass over the history-enriched context.
        let enriched = self.enriched_context(session, context)?;
        let mut candidates = self
            .generate(
                question,
                &enriched,
                &language,
                self.config.selection.top_k_primary,
            )
            .await?;
        if candidates.is_empty() {
            return Err(EngineError::Generation(
                "candidate source returned no candidates".to_string(),
            ));
        }

        // Steps 4-5: filter against recent answers, keep the best survivor.
        let mut survivors = self.filter_candidates(&candidates, session)?;

        // Step 6: diverse escalation when repetition exhausts the primary
        // pass; the guard re-runs over the primary+diverse union.
        if survivors.is_empty() {
            debug!(
                session = %session,
                "all primary candidates repetitive, requesting diverse candidates"
            );
            let diverse = self
                .generate(
                    question,
                    &enriched,
                    &language,
                    self.config.selection.top_k_diverse,
                )
                .await?;
            candidates.extend(diverse);
            survivors = self.filter_candidates(&candidates, session)?;
        }

        // Step 7: degrade to the least-similar candidate rather than refuse.
        let chosen = match best_by_confidence(&survivors) {
            Some(candidate) => candidate.clone(),
            None => {
                warn!(
                    session = %session,
                    "no non-repetitive candidate, degrading to least similar"
                );
                self.degrade_pick(&candidates, session)?
            }
        };

        // Step 8: record the exchange, creating the session on first use.
        self.record_exchange(session, question, &chosen.text, &language)?;

        // Step 9: cache the selection, degrade path included.
        self.cache.put(
            fingerprint,
            CacheEntry {
                answer: chosen.text.clone(),
                confidence: chosen.confidence,
            },
        )?;

        info!(
            session = %session,
            from_cache = false,
            confidence = chosen.confidence.value(),
            "answer selected"
        );
        Ok(AnswerResult {
            text: chosen.text,
            from_cache: false,
        })
    }

    /// Clear a session's conversation history.
    ///
    /// The response cache is untouched; cached answers remain valid for
    /// every session. Unknown sessions are a no-op.
    pub fn reset(&self, session: &SessionId) -> Result<(), EngineError> {
        let mut histories = self
            .histories
            .lock()
            .map_err(|e| EngineError::Internal(format!("session lock poisoned: {}", e)))?;
        if histories.remove(session).is_some() {
            info!(session = %session, "conversation history cleared");
        }
        Ok(())
    }

    /// Snapshot of the exchanges retained for a session, oldest first.
    ///
    /// Unknown sessions yield an empty list; none is created by asking.
    pub fn history(&self, session: &SessionId) -> Vec<Exchange> {
        self.histories
            .lock()
            .ok()
            .and_then(|histories| histories.get(session).map(|history| history.all()))
            .unwrap_or_default()
    }

    /// Number of sessions currently holding history.
    pub fn session_count(&self) -> usize {
        self.histories
            .lock()
            .map(|histories| histories.len())
            .unwrap_or(0)
    }

    pub fn config(&self) -> &RiposteConfig {
        &self.config
    }

    // -- Private helpers --

    /// Call the candidate source, bounded by the configured timeout, and
    /// apply the answer-length cap. Truncation happens here, once; nothing
    /// downstream re-applies it.
    async fn generate(
        &self,
        question: &str,
        context: &str,
        language: &LanguageTag,
        k: usize,
    ) -> Result<Vec<CandidateAnswer>, EngineError> {
        let timeout_ms = self.config.selection.generation_timeout_ms;
        let call = self.source.generate(question, context, language, k);
        let mut candidates = if timeout_ms == 0 {
            call.await?
        } else {
            match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(timeout_ms, "candidate source timed out");
                    return Err(EngineError::Generation(
                        "candidate source timed out".to_string(),
                    ));
                }
            }
        };

        for candidate in &mut candidates {
            candidate.truncate_to(self.config.selection.max_answer_length);
        }
        Ok(candidates)
    }

    fn cached_answer_repetitive(
        &self,
        answer: &str,
        session: &SessionId,
    ) -> Result<bool, EngineError> {
        let histories = self
            .histories
            .lock()
            .map_err(|e| EngineError::Internal(format!("session lock poisoned: {}", e)))?;
        Ok(histories
            .get(session)
            .map(|history| self.guard.is_repetitive(answer, history))
            .unwrap_or(false))
    }

    fn enriched_context(&self, session: &SessionId, base: &str) -> Result<String, EngineError> {
        let histories = self
            .histories
            .lock()
            .map_err(|e| EngineError::Internal(format!("session lock poisoned: {}", e)))?;
        Ok(match histories.get(session) {
            Some(history) => {
                history.enrich_context(base, self.config.conversation.recent_exchanges)
            }
            None => base.to_string(),
        })
    }

    fn filter_candidates(
        &self,
        candidates: &[CandidateAnswer],
        session: &SessionId,
    ) -> Result<Vec<CandidateAnswer>, EngineError> {
        let histories = self
            .histories
            .lock()
            .map_err(|e| EngineError::Internal(format!("session lock poisoned: {}", e)))?;
        Ok(match histories.get(session) {
            Some(history) => self.guard.filter(candidates, history),
            None => candidates.to_vec(),
        })
    }

    fn degrade_pick(
        &self,
        candidates: &[CandidateAnswer],
        session: &SessionId,
    ) -> Result<CandidateAnswer, EngineError> {
        let histories = self
            .histories
            .lock()
            .map_err(|e| EngineError::Internal(format!("session lock poisoned: {}", e)))?;
        let pick = match histories.get(session) {
            Some(history) => self.guard.least_similar(candidates, history),
            None => candidates.first(),
        };
        pick.cloned()
            .ok_or_else(|| EngineError::Generation("no candidates to select from".to_string()))
    }

    fn record_exchange(
        &self,
        session: &SessionId,
        question: &str,
        answer: &str,
        language: &LanguageTag,
    ) -> Result<(), EngineError> {
        let mut histories = self
            .histories
            .lock()
            .map_err(|e| EngineError::Internal(format!("session lock poisoned: {}", e)))?;
        let history = histories.entry(session.clone()).or_insert_with(|| {
            ConversationHistory::new(self.config.conversation.history_capacity)
        });
        history.append(Exchange::new(question, answer, language.clone()));
        Ok(())
    }
}

/// Highest-confidence candidate; ties go to the earliest generated.
fn best_by_confidence(candidates: &[CandidateAnswer]) -> Option<&CandidateAnswer> {
    let mut best: Option<&CandidateAnswer> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.confidence <= current.confidence => {}
            _ => best = Some(candidate),
        }
    }
    best
}

// =============================================================================
// Tests
// =============================================================================
