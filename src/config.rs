//! Configuration management for voicerag
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.voicerag/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Verbosity;
use crate::embedding::engine::{
    DEFAULT_DIMENSION, DEFAULT_MAX_SEQUENCE_LENGTH, DEFAULT_MODEL_ID, DEFAULT_REVISION,
};
use crate::embedding::hashing::DEFAULT_HASHING_DIMENSION;
use crate::embedding::SentenceEncoderOptions;
use crate::errors::{RagError, Result};
use crate::rag::DEFAULT_TOP_K;

/// Complete configuration for voicerag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub encoder: EncoderConfig,
    pub retrieval: RetrievalConfig,
    pub knowledge: KnowledgeConfig,
    pub telemetry: TelemetryConfig,
}

/// Which encoder turns text into vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EncoderBackend {
    /// BERT sentence embeddings (downloads the model on first use)
    Sentence,
    /// Lexical feature hashing, no download
    Hashing,
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub backend: EncoderBackend,
    pub model_id: String,
    pub revision: String,
    pub dimension: usize,
    pub hashing_dimension: usize,
    pub max_sequence_length: usize,
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_k: usize,
}

/// Knowledge base location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: String,
}

/// Telemetry display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub default_verbosity: String,
    pub color_output: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            backend: EncoderBackend::Sentence,
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            dimension: DEFAULT_DIMENSION,
            hashing_dimension: DEFAULT_HASHING_DIMENSION,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: DEFAULT_TOP_K,
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: "data/knowledge.toml".to_string(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            color_output: true,
        }
    }
}

impl EncoderConfig {
    /// Options for the sentence encoder
    pub fn sentence_options(&self) -> SentenceEncoderOptions {
        SentenceEncoderOptions {
            model_id: self.model_id.clone(),
            revision: self.revision.clone(),
            dimension: self.dimension,
            max_sequence_length: self.max_sequence_length,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RagError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| RagError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".voicerag").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.default_k == 0 {
            return Err(RagError::Configuration(
                "default_k must be greater than 0".to_string(),
            ));
        }

        if self.encoder.dimension == 0 || self.encoder.hashing_dimension == 0 {
            return Err(RagError::Configuration(
                "encoder dimensions must be greater than 0".to_string(),
            ));
        }

        if self.encoder.max_sequence_length == 0 {
            return Err(RagError::Configuration(
                "max_sequence_length must be greater than 0".to_string(),
            ));
        }

        if self.encoder.model_id.trim().is_empty() {
            return Err(RagError::Configuration(
                "model_id must not be empty".to_string(),
            ));
        }

        if self.knowledge.path.trim().is_empty() {
            return Err(RagError::Configuration(
                "knowledge path must not be empty".to_string(),
            ));
        }

        if Verbosity::parse(&self.telemetry.default_verbosity).is_none() {
            return Err(RagError::Configuration(format!(
                "Invalid verbosity level: {}",
                self.telemetry.default_verbosity
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RagError::Configuration(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RagError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RagError::Configuration(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get knowledge base path
    pub fn knowledge_path(&self) -> PathBuf {
        Self::expand_path(&self.knowledge.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.encoder.backend, EncoderBackend::Sentence);
        assert_eq!(config.encoder.model_id, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.encoder.dimension, 384);
        assert_eq!(config.retrieval.default_k, 3);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_k() {
        let mut config = Config::default();
        config.retrieval.default_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_dimension() {
        let mut config = Config::default();
        config.encoder.hashing_dimension = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.encoder.model_id = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_verbosity() {
        let mut config = Config::default();
        config.telemetry.default_verbosity = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[encoder]
backend = "hashing"

[retrieval]
default_k = 5
"#,
        )
        .unwrap();
        assert_eq!(config.encoder.backend, EncoderBackend::Hashing);
        assert_eq!(config.encoder.hashing_dimension, 2048);
        assert_eq!(config.retrieval.default_k, 5);
        assert_eq!(config.knowledge.path, "data/knowledge.toml");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.encoder.backend = EncoderBackend::Hashing;
        config.retrieval.default_k = 4;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retrieval]\ndefault_k = 0\n").unwrap();
        assert!(matches!(
            Config::load_from_file(&path),
            Err(RagError::Configuration(_))
        ));
    }

    #[test]
    fn test_sentence_options() {
        let options = Config::default().encoder.sentence_options();
        assert_eq!(options, SentenceEncoderOptions::default());
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.voicerag");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        assert_eq!(Config::expand_path(path).to_string_lossy(), path);
    }
}
