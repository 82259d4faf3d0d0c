use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

const CONFIG_FILE: &str = "config.toml";

/// Global configuration (~/.copilot/config.toml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
}

/// Marketplace-related configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MarketplaceConfig {
    /// Cache-root override; COPILOT_PLUGINS_DIR takes precedence
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from base directory; missing file is the default config
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }
}
