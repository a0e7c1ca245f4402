//! Conversational answer selection for Riposte.
//!
//! Decides which of several model-produced candidate answers is returned for
//! a (question, context, language, history) tuple: an LRU response cache in
//! front of a three-stage selection pipeline (primary pass, diverse
//! escalation, least-similar degrade) with token-overlap repetition
//! detection against per-session conversation history.

pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod guard;
pub mod history;
pub mod selector;
pub mod similarity;
pub mod source;

pub use cache::{CacheEntry, ResponseCache};
pub use error::EngineError;
pub use fingerprint::Fingerprint;
pub use guard::RepetitionGuard;
pub use history::ConversationHistory;
pub use selector::AnswerSelector;
pub use similarity::SimilarityScorer;
pub use source::{CandidateSource, MockCandidateSource};
