use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub links: LinksConfig,
    pub escape: EscapeConfig,
    pub lists: ListsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    /// Longest visible label, in characters, before the ellipsis is appended.
    pub label_max_len: usize,
    pub ellipsis: String,
    pub new_tab: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            label_max_len: 30,
            ellipsis: "...".to_string(),
            new_tab: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EscapeConfig {
    pub html: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListsConfig {
    pub enabled: bool,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// The bundled `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::compiled_default(),
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Self::compiled_default()
            }
        }
    }
}
