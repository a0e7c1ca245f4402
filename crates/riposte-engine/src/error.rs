//! Error types for the answer-selection engine.

use riposte_core::error::RiposteError;

/// Errors from the answer-selection engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("cache capacity must be at least 1, got {0}")]
    CacheCapacity(usize),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RiposteError> for EngineError {
    fn from(err: RiposteError) -> Self {
        EngineError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::EmptyQuestion;
        assert_eq!(err.to_string(), "question cannot be empty");

        let err = EngineError::CacheCapacity(0);
        assert_eq!(err.to_string(), "cache capacity must be at least 1, got 0");

        let err = EngineError::Generation("model offline".to_string());
        assert_eq!(err.to_string(), "generation failed: model offline");

        let err = EngineError::Config("bad threshold".to_string());
        assert_eq!(err.to_string(), "configuration error: bad threshold");

        let err = EngineError::Internal("lock poisoned".to_string());
        assert_eq!(err.to_string(), "internal error: lock poisoned");
    }

    #[test]
    fn test_engine_error_from_riposte_error() {
        let core_err = RiposteError::Config("missing section".to_string());
        let err: EngineError = core_err.into();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("missing section"));
    }

    #[test]
    fn test_engine_error_empty_inner_messages() {
        let err = EngineError::Generation(String::new());
        assert_eq!(err.to_string(), "generation failed: ");

        let err = EngineError::Internal(String::new());
        assert_eq!(err.to_string(), "internal error: ");
    }

    #[test]
    fn test_errors_implement_debug() {
        let err = EngineError::EmptyQuestion;
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("EmptyQuestion"));

        let err = EngineError::CacheCapacity(0);
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("CacheCapacity"));
    }
}
