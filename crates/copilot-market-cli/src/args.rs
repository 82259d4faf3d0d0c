use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "copilot-market")]
#[command(about = "Marketplace registry and plugin installer for Copilot workspaces")]
#[command(version)]
pub struct Cli {
    /// Marketplace cache directory (default: ~/.copilot/plugins/marketplaces,
    /// or COPILOT_PLUGINS_DIR)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage marketplaces
    Marketplace {
        #[command(subcommand)]
        action: MarketplaceAction,
    },

    /// Manage plugins
    Plugin {
        #[command(subcommand)]
        action: PluginAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum MarketplaceAction {
    /// Add a marketplace from a git URL or local path
    Add {
        /// Git URL (https://, git@, ssh://, git://) or local directory
        source: String,
    },

    /// List installed marketplaces
    List,

    /// Pull the latest content for a marketplace
    Update {
        /// Marketplace name (interactive selection when omitted)
        name: Option<String>,
    },

    /// Remove a marketplace and its cached content
    Remove {
        /// Marketplace name (interactive selection when omitted)
        name: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PluginAction {
    /// List plugins across all marketplaces
    List,

    /// Install a plugin's content folders into a workspace
    Install {
        /// Plugin name, optionally qualified as name@marketplace
        /// (interactive selection when omitted)
        name: Option<String>,

        /// Workspace root (default: current directory)
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Overwrite existing destination folders without asking
        #[arg(short, long)]
        force: bool,
    },
}
