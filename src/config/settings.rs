//! Configuration settings for Lectern.

use crate::chunking::{default_boundaries, ChunkingConfig};
use crate::error::{LecternError, Result};
use crate::rerank::{RerankOptions, RerankWeights};
use crate::transcription::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chunking: ChunkingSettings,
    pub detection: DetectionConfig,
    pub rerank: RerankSettings,
    pub embedding: EmbeddingSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub overlap: usize,
    /// Preferred truncation break strings, most preferred first.
    pub respect_boundaries: Vec<String>,
    /// Drop the pre-lecture chatter before chunking.
    pub trim_intro: bool,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            min_tokens: 200,
            max_tokens: 500,
            overlap: 50,
            respect_boundaries: default_boundaries(),
            trim_intro: true,
        }
    }
}

impl ChunkingSettings {
    /// Build the chunker configuration.
    pub fn to_config(&self) -> ChunkingConfig {
        ChunkingConfig {
            min_tokens: self.min_tokens,
            max_tokens: self.max_tokens,
            overlap: self.overlap,
            respect_boundaries: self.respect_boundaries.clone(),
        }
    }
}

/// Reranker toggles and weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankSettings {
    pub boost_recent: bool,
    pub boost_technical: bool,
    pub boost_titles: bool,
    pub weights: RerankWeights,
}

impl Default for RerankSettings {
    fn default() -> Self {
        let options = RerankOptions::default();
        Self {
            boost_recent: options.boost_recent,
            boost_technical: options.boost_technical,
            boost_titles: options.boost_titles,
            weights: RerankWeights::default(),
        }
    }
}

impl RerankSettings {
    pub fn options(&self) -> RerankOptions {
        RerankOptions {
            boost_recent: self.boost_recent,
            boost_technical: self.boost_technical,
            boost_titles: self.boost_titles,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Texts per embeddings request.
    pub batch_size: usize,
    /// Requests allowed in flight at once.
    pub max_concurrent: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            batch_size: 100,
            max_concurrent: 2,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LecternError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lectern")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Set a value by dotted key, e.g. `rerank.weights.title_exact`.
    ///
    /// The new value is parsed according to the type of the value it replaces.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut root =
            toml::Value::try_from(&*self).map_err(|e| LecternError::Config(e.to_string()))?;

        let mut current = &mut root;
        for part in key.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| LecternError::Config(format!("Unknown config key: {}", key)))?;
        }

        *current = parse_like(current, value)
            .ok_or_else(|| LecternError::Config(format!("Invalid value for {}: {}", key, value)))?;

        *self = root.try_into().map_err(|e: toml::de::Error| LecternError::Config(e.to_string()))?;
        Ok(())
    }
}

fn parse_like(existing: &toml::Value, raw: &str) -> Option<toml::Value> {
    match existing {
        toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
        toml::Value::Integer(_) => raw.parse().ok().map(toml::Value::Integer),
        toml::Value::Float(_) => raw.parse().ok().map(toml::Value::Float),
        toml::Value::Boolean(_) => raw.parse().ok().map(toml::Value::Boolean),
        toml::Value::Array(_) => Some(toml::Value::Array(
            raw.split(',')
                .map(|item| toml::Value::String(item.trim().to_string()))
                .filter(|item| item.as_str().is_some_and(|s| !s.is_empty()))
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.general.log_level, "warn");
        assert_eq!(settings.chunking.min_tokens, 200);
        assert!(settings.chunking.trim_intro);
        assert_eq!(settings.embedding.dimensions, 1536);
        assert_eq!(settings.rerank.options(), RerankOptions::default());
        assert!(settings.chunking.to_config().validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.chunking.max_tokens = 800;
        settings.rerank.boost_recent = false;
        settings.rerank.weights.title_exact = 0.2;
        settings.detection.keywords = vec!["let's begin".to_string()];
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(path.as_path())).unwrap();
        assert_eq!(loaded.chunking.max_tokens, 800);
        assert!(!loaded.rerank.boost_recent);
        assert_eq!(loaded.rerank.weights.title_exact, 0.2);
        assert_eq!(loaded.detection.keywords, vec!["let's begin".to_string()]);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(settings.chunking.overlap, 50);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[chunking]\noverlap = 10\n\n[rerank.weights]\ncode_cap = 0.2\n",
        )
        .unwrap();

        let settings = Settings::load_from(Some(path.as_path())).unwrap();
        assert_eq!(settings.chunking.overlap, 10);
        assert_eq!(settings.chunking.max_tokens, 500);
        assert_eq!(settings.rerank.weights.code_cap, 0.2);
        assert_eq!(settings.rerank.weights.code_pattern, 0.01);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking\n").unwrap();
        assert!(matches!(
            Settings::load_from(Some(path.as_path())),
            Err(LecternError::TomlParse(_))
        ));
    }

    #[test]
    fn test_set_value() {
        let mut settings = Settings::default();
        settings.set_value("chunking.max_tokens", "640").unwrap();
        settings.set_value("rerank.boost_technical", "false").unwrap();
        settings.set_value("rerank.weights.type_cap", "0.3").unwrap();
        settings.set_value("embedding.model", "text-embedding-3-large").unwrap();
        settings.set_value("detection.keywords", "welcome, let's start").unwrap();

        assert_eq!(settings.chunking.max_tokens, 640);
        assert!(!settings.rerank.boost_technical);
        assert_eq!(settings.rerank.weights.type_cap, 0.3);
        assert_eq!(settings.embedding.model, "text-embedding-3-large");
        assert_eq!(settings.detection.keywords, vec!["welcome", "let's start"]);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(settings.set_value("chunking.nope", "1").is_err());
        assert!(settings.set_value("chunking.max_tokens", "lots").is_err());
        assert!(settings.set_value("rerank.boost_recent", "maybe").is_err());
        assert_eq!(settings.chunking.max_tokens, 500);
    }

    #[test]
    fn test_expand_path() {
        let expanded = Settings::expand_path("/tmp/lectern.toml");
        assert_eq!(expanded, PathBuf::from("/tmp/lectern.toml"));
    }
}
