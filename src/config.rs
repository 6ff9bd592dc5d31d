//! Configuration loading and management
//!
//! Handles parsing of `<home>/config.toml`. Every field has a default, so a
//! missing file and an empty file behave the same.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::ids::ARCHIVED_ID_BASE;
use crate::storage::CONFIG_FILE;

/// Upper bound for `ids.archived_base`
const MAX_ARCHIVED_BASE: u32 = 1_000_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Id allocation and compaction
    #[serde(default)]
    pub ids: IdsConfig,

    /// Search output
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdsConfig {
    /// First id of the band compaction assigns to archived records
    #[serde(default = "default_archived_base")]
    pub archived_base: u32,
}

fn default_archived_base() -> u32 {
    ARCHIVED_ID_BASE
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            archived_base: default_archived_base(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    /// Characters of context kept on each side of a match
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
}

fn default_context_chars() -> usize {
    50
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_chars: default_context_chars(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from the home directory, or return defaults
    pub fn load_from_home(home: &Path) -> Self {
        let config_path = home.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring invalid config, using defaults"
                );
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ids.archived_base < 2 {
            return Err(Error::InvalidConfig(
                "ids.archived_base must be >= 2".to_string(),
            ));
        }
        if self.ids.archived_base > MAX_ARCHIVED_BASE {
            return Err(Error::InvalidConfig(format!(
                "ids.archived_base must be <= {MAX_ARCHIVED_BASE}"
            )));
        }
        if self.search.context_chars == 0 {
            return Err(Error::InvalidConfig(
                "search.context_chars must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
