use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, RiposteError};

/// Top-level configuration for the Riposte engine.
///
/// Loaded from `~/.riposte/config.toml` by default. Each section corresponds
/// to one stage of the selection pipeline. Immutable after startup: the
/// engine takes a snapshot at construction and never re-reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiposteConfig {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub repetition: RepetitionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for RiposteConfig {
    fn default() -> Self {
        Self {
            selection: SelectionConfig::default(),
            conversation: ConversationConfig::default(),
            repetition: RepetitionConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RiposteConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RiposteConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RiposteError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Candidate generation and selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Candidates requested on the first generation pass.
    pub top_k_primary: usize,
    /// Additional candidates requested when every primary candidate is
    /// filtered as repetitive.
    pub top_k_diverse: usize,
    /// Hard cap on answer length in characters, applied once at generation.
    pub max_answer_length: usize,
    /// Timeout for one candidate-source call, in milliseconds. 0 disables.
    pub generation_timeout_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            top_k_primary: 3,
            top_k_diverse: 5,
            max_answer_length: 150,
            generation_timeout_ms: 30_000,
        }
    }
}

/// Per-session conversation memory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Exchanges included when assembling context for the model call.
    pub recent_exchanges: usize,
    /// Maximum exchanges retained per session (oldest evicted first).
    pub history_capacity: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            recent_exchanges: 3,
            history_capacity: 10,
        }
    }
}

/// Repetition detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepetitionConfig {
    /// Recent exchanges checked when scoring a candidate for repetition.
    pub history_window: usize,
    /// Similarity at or above this marks a candidate repetitive.
    pub similarity_threshold: f64,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            history_window: 5,
            similarity_threshold: 0.7,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached answers. Must be at least 1; the cache constructor
    /// rejects 0 before the engine serves traffic.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
