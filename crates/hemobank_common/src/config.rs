//! User configuration
//!
//! Optional TOML file at ~/.config/hemobank/config.toml. Every field has a
//! default, so a missing file or a partial file both work.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::BloodBankDb;

/// Color display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Auto-detect based on terminal capabilities
    Auto,
    /// Force ANSI colors
    Basic,
    /// No colors (plain text)
    None,
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Auto
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; defaults to the user data directory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl BankConfig {
    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    /// Default config file location
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("hemobank")
            .join("config.toml")
    }

    /// Resolved database path
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(BloodBankDb::default_path)
    }
}
