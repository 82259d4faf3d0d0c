pub mod config;
pub mod error;
pub mod fetch;
pub mod git;
pub mod install;
pub mod plugins;
pub mod prompt;
pub mod registry;
pub mod schema;
pub mod service;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{MarketError, Result};
pub use fetch::{read_manifest, ManifestFetcher, MANIFEST_SUBPATH};
pub use git::{CloneOptions, GitClient, SystemGit};
pub use install::{copy_dir_recursive, Installer};
pub use plugins::{
    InstallSummary, PluginAggregator, PluginInstaller, CATEGORY_DESTINATIONS,
    WORKSPACE_CONTENT_DIR,
};
pub use prompt::{Confirmer, NoPrompt, SelectItem, Selector};
pub use registry::{MarketPaths, RegistryStore};
pub use schema::{validate_manifest, validate_registry_entry, ValidationOutcome};
pub use service::MarketplaceService;
pub use source::MarketplaceSource;
pub use types::{
    EntrySource, Manifest, MarketplaceListing, Owner, Plugin, PluginEntry, Registry,
    RegistryEntry, SourceKind,
};
