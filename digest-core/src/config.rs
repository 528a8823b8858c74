//! Configuration management for Digest.
//!
//! Configuration is loaded in order of precedence:
//! 1. Defaults
//! 2. Config file (~/.digest/config.toml)
//! 3. Environment variables
//! 4. CLI flags (handled at CLI layer)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Summarization model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the model CLI binary (default: "lamini")
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Default model identifier
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Per-call timeout in seconds (0 = no timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_binary() -> String {
    "lamini".to_string()
}

fn default_model() -> String {
    "lamini-flan-t5-248m".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            default_model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk sent to the model
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

fn default_max_chunk_chars() -> usize {
    700
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

/// Text analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of entries to keep in the word frequency table
    #[serde(default = "default_top_words")]
    pub top_words: usize,

    /// Stop words excluded from the frequency table
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

fn default_top_words() -> usize {
    15
}

fn default_stop_words() -> Vec<String> {
    [
        "the", "and", "for", "that", "this", "with", "from", "are", "was", "were", "has", "have",
        "had", "but", "not", "all", "can", "will", "their", "they", "which", "been", "also",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_words: default_top_words(),
            stop_words: default_stop_words(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Returns the default Digest configuration directory (~/.digest)
    pub fn digest_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".digest"))
    }

    /// Returns the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        Self::digest_dir().map(|d| d.join("config.toml"))
    }

    /// Load configuration from the default path with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = Self::default_config_path() {
            if path.exists() {
                Self::load_from_file(&path)?
            } else {
                Config::default()
            }
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("DIGEST_MODEL") {
            self.model.default_model = model;
        }

        if let Ok(binary) = std::env::var("DIGEST_MODEL_BINARY") {
            self.model.binary = binary;
        }

        if let Ok(port) = std::env::var("DIGEST_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(host) = std::env::var("DIGEST_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("DIGEST_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(chars) = std::env::var("DIGEST_MAX_CHUNK_CHARS") {
            if let Ok(chars) = chars.parse() {
                self.chunking.max_chunk_chars = chars;
            }
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = Self::default_config_path() {
            self.save_to_file(&path)
        } else {
            Err(ConfigError::ValidationError(
                "Could not determine config path".to_string(),
            ))
        }
    }

    /// Save configuration to a specific file
    pub fn save_to_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the server URL
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.server.port)
    }

    /// Ensure the Digest directory exists
    pub fn ensure_dirs() -> std::io::Result<()> {
        if let Some(digest_dir) = Self::digest_dir() {
            std::fs::create_dir_all(&digest_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.binary, "lamini");
        assert_eq!(config.model.default_model, "lamini-flan-t5-248m");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.chunking.max_chunk_chars, 700);
        assert_eq!(config.analysis.top_words, 15);
        assert!(config.analysis.stop_words.contains(&"the".to_string()));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.server.port, parsed.server.port);
        assert_eq!(
            config.chunking.max_chunk_chars,
            parsed.chunking.max_chunk_chars
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[server]
port = 9999

[chunking]
max_chunk_chars = 2000
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        // Custom values
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.chunking.max_chunk_chars, 2000);
        // Defaults still applied
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.default_model, "lamini-flan-t5-248m");
    }
}
