//! Manifest fetching
//!
//! Retrieves only the marketplace manifest for validation: a direct read
//! for local sources, and a depth-1 no-checkout clone plus selective
//! checkout for git sources so a candidate repository is never transferred
//! in full before it passes validation.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;

use crate::error::{MarketError, Result};
use crate::git::{CloneOptions, GitClient};
use crate::source::MarketplaceSource;
use crate::types::Manifest;

/// Fixed manifest subpath inside a marketplace
pub const MANIFEST_SUBPATH: &str = ".copilot-plugin/marketplace.json";

/// Manifest fetcher over the git boundary
pub struct ManifestFetcher<'a> {
    git: &'a dyn GitClient,
}

impl<'a> ManifestFetcher<'a> {
    pub fn new(git: &'a dyn GitClient) -> Self {
        Self { git }
    }

    /// Fetch the raw manifest JSON for a source
    pub fn fetch(&self, source: &MarketplaceSource) -> Result<Value> {
        match source {
            MarketplaceSource::Directory(path) => {
                let manifest_path = path.join(MANIFEST_SUBPATH);
                let content =
                    fs::read_to_string(&manifest_path).map_err(|e| MarketError::Fetch {
                        origin: manifest_path.display().to_string(),
                        message: e.to_string(),
                    })?;

                serde_json::from_str(&content).map_err(|e| MarketError::Fetch {
                    origin: manifest_path.display().to_string(),
                    message: e.to_string(),
                })
            }
            MarketplaceSource::Git(url) => self.fetch_git(url),
        }
    }

    /// Manifest-only fetch from a git source. The temporary clone directory
    /// is dropped (and removed) on every exit path, including clone,
    /// checkout, and parse failures.
    fn fetch_git(&self, url: &str) -> Result<Value> {
        let temp = TempDir::with_prefix("copilot-mp-").map_err(|e| MarketError::Fetch {
            origin: url.to_string(),
            message: e.to_string(),
        })?;

        self.git
            .clone_repo(url, temp.path(), &CloneOptions::shallow_no_checkout())
            .map_err(|e| MarketError::Fetch {
                origin: url.to_string(),
                message: e.to_string(),
            })?;

        self.git
            .checkout_paths(temp.path(), "HEAD", &[MANIFEST_SUBPATH])
            .map_err(|e| MarketError::Fetch {
                origin: url.to_string(),
                message: e.to_string(),
            })?;

        let content =
            fs::read_to_string(temp.path().join(MANIFEST_SUBPATH)).map_err(|e| {
                MarketError::Fetch {
                    origin: url.to_string(),
                    message: e.to_string(),
                }
            })?;

        serde_json::from_str(&content).map_err(|e| MarketError::Fetch {
            origin: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Read and parse a marketplace's own cached manifest
pub fn read_manifest(marketplace_dir: &Path) -> Result<Manifest> {
    let path = marketplace_dir.join(MANIFEST_SUBPATH);
    let content = fs::read_to_string(&path)?;

    serde_json::from_str(&content).map_err(|e| MarketError::ManifestParse {
        path,
        message: e.to_string(),
    })
}
