//! Marketplace registry persistence
//!
//! Manages known_marketplaces.json under the plugins directory. A missing
//! or corrupted registry file loads as an empty registry so one bad write
//! can never break every marketplace operation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Registry;

const REGISTRY_FILE: &str = "known_marketplaces.json";

/// Path layout for the plugins directory and marketplace cache
#[derive(Debug, Clone)]
pub struct MarketPaths {
    /// Base plugins directory (~/.copilot/plugins)
    plugins_dir: PathBuf,
    /// Cache-root override (COPILOT_PLUGINS_DIR), resolved by the caller
    cache_override: Option<PathBuf>,
}

impl MarketPaths {
    /// Build from an injected home directory and optional cache override
    pub fn new(home: &Path, cache_override: Option<PathBuf>) -> Self {
        Self {
            plugins_dir: home.join(".copilot").join("plugins"),
            cache_override,
        }
    }

    /// Use an explicit plugins directory (for testing)
    pub fn with_plugins_dir(plugins_dir: PathBuf) -> Self {
        Self {
            plugins_dir,
            cache_override: None,
        }
    }

    /// Base plugins directory
    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    /// Cache root under which marketplaces are materialized
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_override
            .clone()
            .unwrap_or_else(|| self.plugins_dir.join("marketplaces"))
    }

    /// Cache directory for one marketplace
    pub fn marketplace_dir(&self, name: &str) -> PathBuf {
        self.cache_dir().join(name)
    }

    /// Registry file path
    pub fn registry_file(&self) -> PathBuf {
        self.plugins_dir.join(REGISTRY_FILE)
    }
}

/// Registry store - reads and writes known_marketplaces.json
#[derive(Debug, Clone)]
pub struct RegistryStore {
    registry_path: PathBuf,
}

impl RegistryStore {
    pub fn new(paths: &MarketPaths) -> Self {
        Self {
            registry_path: paths.registry_file(),
        }
    }

    /// Create with an explicit registry file path (for testing)
    pub fn with_path(registry_path: PathBuf) -> Self {
        Self { registry_path }
    }

    /// Registry file path
    pub fn path(&self) -> &Path {
        &self.registry_path
    }

    /// Load the registry. Missing or corrupted file is an empty registry.
    pub fn load(&self) -> Registry {
        let Ok(content) = fs::read_to_string(&self.registry_path) else {
            return Registry::new();
        };

        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Save the registry, creating parent directories lazily
    pub fn save(&self, registry: &Registry) -> Result<()> {
        if let Some(parent) = self.registry_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(registry)?;
        fs::write(&self.registry_path, content)?;
        Ok(())
    }
}
