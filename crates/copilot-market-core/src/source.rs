//! Source string classification
//!
//! A user-supplied marketplace source is either a git URL or a local
//! directory path. Classification is pure; home-directory expansion runs
//! against an injected home path so path computation stays deterministic.

use std::path::{Path, PathBuf};

/// URL prefixes treated as version-controlled sources
const GIT_PREFIXES: &[&str] = &["http://", "https://", "git@", "ssh://", "git://"];

/// Classified marketplace source
#[derive(Debug, Clone, PartialEq)]
pub enum MarketplaceSource {
    /// Git URL (clone + pull)
    Git(String),
    /// Local directory path (recursive copy)
    Directory(PathBuf),
}

impl MarketplaceSource {
    /// Classify a raw source string, expanding a leading `~` against `home`
    pub fn resolve(raw: &str, home: &Path) -> Self {
        if GIT_PREFIXES.iter().any(|p| raw.starts_with(p)) {
            return Self::Git(raw.to_string());
        }

        let path = if raw == "~" {
            home.to_path_buf()
        } else if let Some(rest) = raw.strip_prefix("~/") {
            home.join(rest)
        } else {
            PathBuf::from(raw)
        };

        Self::Directory(path)
    }

    /// Registry identifier: `owner/repo` for git, `local/<dirname>` for directories
    pub fn identifier(&self) -> String {
        match self {
            Self::Git(url) => repo_slug(url),
            Self::Directory(path) => {
                let dirname = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                format!("local/{}", dirname)
            }
        }
    }

    /// Human-readable form for error messages
    pub fn display(&self) -> String {
        match self {
            Self::Git(url) => url.clone(),
            Self::Directory(path) => path.display().to_string(),
        }
    }
}

/// Extract `owner/repo` from a git URL, tolerating scp-like and scheme forms
fn repo_slug(url: &str) -> String {
    // git@host:owner/repo.git -> owner/repo.git
    let tail = if let Some((_, rest)) = url.split_once(':') {
        if url.starts_with("git@") {
            rest
        } else {
            // scheme://host/owner/repo.git -> drop scheme and host
            rest.trim_start_matches('/')
                .split_once('/')
                .map(|(_, p)| p)
                .unwrap_or(rest)
        }
    } else {
        url
    };

    let tail = tail.trim_end_matches('/').trim_end_matches(".git");
    let segments: Vec<&str> = tail.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [.., owner, repo] => format!("{}/{}", owner, repo),
        [single] => (*single).to_string(),
        [] => String::new(),
    }
}
