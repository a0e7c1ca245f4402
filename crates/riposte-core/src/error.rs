use thiserror::Error;

/// Top-level error type for the Riposte system.
///
/// Covers the concerns this crate owns (configuration, serialization, I/O).
/// The engine crate defines its own error type and implements
/// `From<RiposteError>` so that the `?` operator works across the crate
/// boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RiposteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for RiposteError {
    fn from(err: toml::de::Error) -> Self {
        RiposteError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RiposteError {
    fn from(err: toml::ser::Error) -> Self {
        RiposteError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RiposteError {
    fn from(err: serde_json::Error) -> Self {
        RiposteError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Riposte operations.
pub type Result<T> = std::result::Result<T, RiposteError>;
