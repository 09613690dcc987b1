//! File-based logging configuration (YAML)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigResult};
use crate::builder::{Flag, LoggingBuilder, SinkKind};
use crate::registry::Role;

/// Logging configuration document
///
/// ```yaml
/// flags: [print_info, print_warnings]
/// roles:
///   progress: [console]
///   error: [console, system]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Shared switches
    #[serde(default)]
    pub flags: Vec<Flag>,

    /// Sinks enabled per role; absent roles stay silent
    #[serde(default)]
    pub roles: BTreeMap<Role, Vec<SinkKind>>,
}

impl LoggingConfig {
    /// Default console setup of a packaging CLI: errors, warnings and the summary
    pub fn standard() -> Self {
        let mut roles = BTreeMap::new();
        for role in [Role::Error, Role::Progress, Role::Summary] {
            roles.insert(role, vec![SinkKind::Console]);
        }
        Self {
            flags: vec![Flag::PrintWarnings],
            roles,
        }
    }

    /// Every role on the console with every flag set
    pub fn verbose() -> Self {
        Self {
            flags: vec![
                Flag::PrintInfo,
                Flag::PrintWarnings,
                Flag::PrintCommandResult,
                Flag::PrintQuietCommands,
                Flag::AlwaysPrintStackTrace,
            ],
            roles: Role::ALL.into_iter().map(|r| (r, vec![SinkKind::Console])).collect(),
        }
    }

    /// User-level config path (~/.config/packlog/logging.yaml)
    pub fn user_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"));
        config_dir.join("packlog").join("logging.yaml")
    }

    /// Load the user-level config, or the standard setup if there is none
    pub fn load_user() -> ConfigResult<Self> {
        let path = Self::user_path();
        if !path.exists() {
            return Ok(Self::standard());
        }
        Self::load(path)
    }

    /// Load from a YAML file; a missing file yields an empty config
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Save as YAML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject roles listed with no sink
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some((role, _)) = self.roles.iter().find(|(_, kinds)| kinds.is_empty()) {
            return Err(ConfigError::Other(format!(
                "Role '{}' is listed without any sink",
                role
            )));
        }
        Ok(())
    }

    /// Feed flags and sink routing into a builder
    pub fn apply(&self, builder: LoggingBuilder) -> LoggingBuilder {
        let builder = builder.flags(self.flags.iter().copied());
        self.roles.iter().fold(builder, |builder, (role, kinds)| {
            kinds.iter().fold(builder, |builder, kind| builder.enable(*role, *kind))
        })
    }
}
