//! Shared domain types for the answer-selection engine.
//!
//! Newtype wrappers enforce their invariants at construction (clamping,
//! truncation, fallback defaults) so downstream code never re-validates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Newtype Wrappers - Identity
// =============================================================================

/// Opaque session identifier supplied by the caller.
///
/// The engine never interprets the contents; any non-empty string the web
/// layer uses for session transport works. Compared and hashed by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random identifier, for callers without their own scheme.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// FLORES-200 style language tag (e.g. "eng_Latn", "spa_Latn").
///
/// An empty or whitespace-only tag falls back to English at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageTag(pub String);

impl LanguageTag {
    pub const ENGLISH: &'static str = "eng_Latn";

    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if tag.trim().is_empty() {
            Self(Self::ENGLISH.to_string())
        } else {
            Self(tag)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self(Self::ENGLISH.to_string())
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Newtype Wrappers - Numeric
// =============================================================================

/// Model confidence for a candidate answer. Range: 0.0 (none) to 1.0 (certain).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(pub f64);

impl Confidence {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

// =============================================================================
// Entity Structs
// =============================================================================

/// Character offsets of an answer span within its source context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanOffsets {
    pub start: usize,
    pub end: usize,
}

/// One model-proposed answer, pre-selection.
///
/// Ephemeral: produced and consumed within a single request, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnswer {
    pub text: String,
    pub confidence: Confidence,
    /// Source span, when the capability reports one.
    pub span: Option<SpanOffsets>,
}

impl CandidateAnswer {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence: Confidence::new(confidence),
            span: None,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some(SpanOffsets { start, end });
        self
    }

    /// Cap the answer text to `max_chars` characters.
    ///
    /// Applied exactly once, at the generation boundary; downstream code must
    /// not re-truncate.
    pub fn truncate_to(&mut self, max_chars: usize) {
        if self.text.chars().count() > max_chars {
            self.text = self.text.chars().take(max_chars).collect();
        }
    }
}

/// One completed conversational turn.
///
/// Immutable once created; owned exclusively by the session history that
/// recorded it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
    pub language: LanguageTag,
}

impl Exchange {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        language: LanguageTag,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
            language,
        }
    }
}

/// The outcome of one `answer` operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub text: String,
    /// True iff the cache satisfied the request without a generation pass.
    pub from_cache: bool,
}
