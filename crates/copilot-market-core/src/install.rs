//! Marketplace content installation
//!
//! Materializes full marketplace content into the cache: a depth-1 clone
//! for git sources, a recursive copy (skipping `.git`) for local ones.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{MarketError, Result};
use crate::git::{CloneOptions, GitClient};
use crate::source::MarketplaceSource;

/// Installer over the git boundary
pub struct Installer<'a> {
    git: &'a dyn GitClient,
}

impl<'a> Installer<'a> {
    pub fn new(git: &'a dyn GitClient) -> Self {
        Self { git }
    }

    /// Materialize `source` at `target`
    pub fn install(&self, source: &MarketplaceSource, target: &Path) -> Result<()> {
        match source {
            MarketplaceSource::Git(url) => self
                .git
                .clone_repo(url, target, &CloneOptions::shallow())
                .map_err(|e| MarketError::Install {
                    path: target.to_path_buf(),
                    message: e.to_string(),
                }),
            MarketplaceSource::Directory(path) => {
                copy_dir_recursive(path, target).map_err(|e| MarketError::Install {
                    path: target.to_path_buf(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Copy a directory tree, skipping `.git`
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git")
    {
        let entry = entry.map_err(|e| {
            MarketError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walk failed")
            }))
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .expect("walked path is under src");
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}
