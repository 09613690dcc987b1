//! Logging configuration
//!
//! Supports configuring the builder from a document:
//! - `LoggingConfig`: flags plus per-role sink kinds, YAML or JSON
//! - user-level file at `~/.config/packlog/logging.yaml`

mod file;

pub use file::LoggingConfig;

/// Errors that can occur while loading or saving logging configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
