//! Marketplace registry service
//!
//! Orchestrates add/update/remove/list of marketplaces over the source
//! resolver, manifest fetcher, schema validators, installer, and registry
//! store. Validation and collision failures are detected before any
//! mutation; nothing is written on those paths.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{MarketError, Result};
use crate::fetch::{read_manifest, ManifestFetcher};
use crate::git::{GitClient, SystemGit};
use crate::install::Installer;
use crate::registry::{MarketPaths, RegistryStore};
use crate::schema;
use crate::source::MarketplaceSource;
use crate::types::{EntrySource, Manifest, MarketplaceListing, RegistryEntry, SourceKind};

pub struct MarketplaceService {
    home: PathBuf,
    paths: MarketPaths,
    store: RegistryStore,
    git: Box<dyn GitClient>,
}

impl MarketplaceService {
    /// Create against a home directory, with an optional cache-root
    /// override (resolved by the caller from COPILOT_PLUGINS_DIR or config)
    pub fn new(home: PathBuf, cache_override: Option<PathBuf>) -> Self {
        Self::with_client(home, cache_override, Box::new(SystemGit))
    }

    /// Create with a custom git client (for testing)
    pub fn with_client(
        home: PathBuf,
        cache_override: Option<PathBuf>,
        git: Box<dyn GitClient>,
    ) -> Self {
        let paths = MarketPaths::new(&home, cache_override);
        let store = RegistryStore::new(&paths);
        Self {
            home,
            paths,
            store,
            git,
        }
    }

    pub fn paths(&self) -> &MarketPaths {
        &self.paths
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Create the cache root if it does not exist yet
    pub fn ensure_cache_dir(&self) -> Result<()> {
        fs::create_dir_all(self.paths.cache_dir())?;
        Ok(())
    }

    /// Add a marketplace from a raw source string (git URL or local path).
    /// Returns the marketplace name on success.
    pub fn add_marketplace(&self, raw_source: &str) -> Result<String> {
        let source = MarketplaceSource::resolve(raw_source, &self.home);

        let fetcher = ManifestFetcher::new(self.git.as_ref());
        let candidate = fetcher.fetch(&source)?;

        let outcome = schema::validate_manifest(&candidate);
        if !outcome.is_valid() {
            return Err(MarketError::ValidationFailed {
                errors: outcome.errors,
            });
        }

        let manifest: Manifest =
            serde_json::from_value(candidate).map_err(|e| MarketError::ValidationFailed {
                errors: vec![e.to_string()],
            })?;

        self.ensure_cache_dir()?;
        let target = self.paths.marketplace_dir(&manifest.name);

        // Collision check. NotFound is the success path; any other fs error
        // (e.g. permission denied) must not pass as "no collision".
        match fs::metadata(&target) {
            Ok(_) => {
                return Err(MarketError::MarketplaceExists {
                    name: manifest.name,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Installer::new(self.git.as_ref()).install(&source, &target)?;

        let entry = RegistryEntry {
            source: EntrySource {
                kind: match source {
                    MarketplaceSource::Git(_) => SourceKind::Github,
                    MarketplaceSource::Directory(_) => SourceKind::Directory,
                },
                identifier: source.identifier(),
            },
            install_location: target.to_string_lossy().to_string(),
            last_updated: chrono::Utc::now().to_rfc3339(),
        };

        let entry_value = serde_json::to_value(&entry)?;
        let outcome = schema::validate_registry_entry(&entry_value);
        if !outcome.is_valid() {
            let _ = fs::remove_dir_all(&target);
            return Err(MarketError::ValidationFailed {
                errors: outcome.errors,
            });
        }

        // Read-modify-write; no cross-process locking, last writer wins.
        let mut registry = self.store.load();
        registry.insert(manifest.name.clone(), entry);
        if let Err(e) = self.store.save(&registry) {
            // Compensating cleanup so a retry does not collide with an
            // orphaned cache copy.
            let _ = fs::remove_dir_all(&target);
            return Err(e);
        }

        Ok(manifest.name)
    }

    /// Pull the latest content for a registered marketplace and refresh its
    /// timestamp. Only works for version-controlled marketplaces with a
    /// remote; others fail with the distinguished NOT_A_GIT_REPO signal.
    pub fn update_marketplace(&self, name: &str) -> Result<()> {
        let mut registry = self.store.load();
        let entry = registry
            .get_mut(name)
            .ok_or_else(|| MarketError::MarketplaceNotFound {
                name: name.to_string(),
            })?;

        let location = PathBuf::from(&entry.install_location);
        if !self.git.is_repo(&location)? || self.git.remotes(&location)?.is_empty() {
            return Err(MarketError::NotAGitRepo);
        }

        self.git
            .pull(&location)
            .map_err(|e| MarketError::Git(format!("Git update failed: {e}")))?;

        entry.last_updated = chrono::Utc::now().to_rfc3339();
        self.store.save(&registry)
    }

    /// Remove a marketplace's cache directory and registry entry. Missing
    /// directory and missing entry are both tolerated.
    pub fn remove_marketplace(&self, name: &str) -> Result<()> {
        let target = self.paths.marketplace_dir(name);
        match fs::remove_dir_all(&target) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(MarketError::Removal {
                    path: target,
                    message: e.to_string(),
                })
            }
        }

        let mut registry = self.store.load();
        registry.remove(name);
        self.store.save(&registry)
    }

    /// List installed marketplaces by re-reading each cache entry's own
    /// manifest. Best-effort: a corrupted or manifest-less entry is
    /// silently omitted rather than failing the whole listing.
    pub fn get_marketplaces(&self) -> Result<Vec<MarketplaceListing>> {
        self.ensure_cache_dir()?;

        let mut listings = Vec::new();
        for dir_entry in fs::read_dir(self.paths.cache_dir())? {
            let dir_entry = dir_entry?;
            if !dir_entry.path().is_dir() {
                continue;
            }

            if let Ok(manifest) = read_manifest(&dir_entry.path()) {
                listings.push(MarketplaceListing {
                    name: manifest.name,
                    description: manifest.description,
                });
            }
        }

        listings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listings)
    }
}
