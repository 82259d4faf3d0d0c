use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Manifest validation failed: {}", errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    #[error("Marketplace '{name}' already exists")]
    MarketplaceExists { name: String },

    #[error("Marketplace not found: {name}")]
    MarketplaceNotFound { name: String },

    #[error("Plugin not found: {name}")]
    PluginNotFound { name: String },

    // Distinguished signal: callers show a benign "only works for
    // version-controlled marketplaces" message instead of a hard error.
    #[error("NOT_A_GIT_REPO")]
    NotAGitRepo,

    // `origin` rather than `source`: the latter name is reserved by
    // thiserror for the error-chain source.
    #[error("Failed to fetch manifest from '{origin}': {message}")]
    Fetch { origin: String, message: String },

    #[error("Failed to install marketplace at {path}: {message}")]
    Install { path: PathBuf, message: String },

    #[error("Failed to remove {path}: {message}")]
    Removal { path: PathBuf, message: String },

    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("No workspace folder")]
    NoWorkspaceFolder,

    #[error("Home directory not found")]
    HomeNotFound,

    #[error("Git error: {0}")]
    Git(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MarketError>;

impl MarketError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MarketplaceNotFound { .. } | Self::PluginNotFound { .. } => 2,
            Self::MarketplaceExists { .. } => 3,
            Self::ValidationFailed { .. } => 4,
            Self::NotAGitRepo => 5,
            Self::NoWorkspaceFolder => 6,
            _ => 1,
        }
    }
}
