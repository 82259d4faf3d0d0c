//! Marketplace and registry type definitions
//!
//! Wire types for `.copilot-plugin/marketplace.json` manifests and the
//! persisted `known_marketplaces.json` registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Marketplace manifest (parsed from marketplace.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Marketplace name (unique identifier, no internal whitespace)
    pub name: String,
    /// Owner information
    pub owner: Owner,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Declared plugins, in manifest order
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

/// Marketplace owner information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    /// Owner name
    pub name: String,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
}

/// Plugin entry in marketplace.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Plugin name (unique within its marketplace)
    pub name: String,
    /// Relative path to the plugin's content inside the marketplace
    pub source: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Version
    #[serde(default)]
    pub version: Option<String>,
}

/// Registry entry source kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Version-controlled source (clone + pull)
    Github,
    /// Local directory source (recursive copy)
    Directory,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Github => write!(f, "github"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Source specification for a registered marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySource {
    /// Source kind
    pub kind: SourceKind,
    /// `owner/repo` for git sources, `local/<dirname>` for directories
    pub identifier: String,
}

/// Registered marketplace entry (from known_marketplaces.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Source specification
    pub source: EntrySource,
    /// Absolute path to the materialized cache copy
    #[serde(rename = "installLocation")]
    pub install_location: String,
    /// Last updated timestamp (RFC 3339)
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// known_marketplaces.json structure: marketplace name -> entry.
/// BTreeMap keeps key order stable across writes of the file.
pub type Registry = BTreeMap<String, RegistryEntry>;

/// Plugin with its owning marketplace attached (aggregated view)
#[derive(Debug, Clone, PartialEq)]
pub struct Plugin {
    /// Plugin name
    pub name: String,
    /// Relative path within the marketplace
    pub source: String,
    /// Owning marketplace
    pub marketplace_name: String,
    /// Description
    pub description: Option<String>,
    /// Version
    pub version: Option<String>,
}

impl Plugin {
    /// Create from a manifest entry and its marketplace name
    pub fn from_entry(entry: &PluginEntry, marketplace_name: &str) -> Self {
        Self {
            name: entry.name.clone(),
            source: entry.source.clone(),
            marketplace_name: marketplace_name.to_string(),
            description: entry.description.clone(),
            version: entry.version.clone(),
        }
    }
}

/// Marketplace listing for display (name + optional description)
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceListing {
    pub name: String,
    pub description: Option<String>,
}
