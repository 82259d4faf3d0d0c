use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use copilot_market_core::{
    Config, Confirmer, MarketError, MarketplaceService, Plugin, PluginAggregator,
    PluginInstaller, Result, SelectItem, Selector,
};

mod args;
use args::{Cli, Commands, MarketplaceAction, PluginAction, Shell};

const PLUGINS_DIR_ENV: &str = "COPILOT_PLUGINS_DIR";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let home = match dirs::home_dir() {
        Some(home) => home,
        None => {
            eprintln!("{} {}", "[ERROR]".red().bold(), MarketError::HomeNotFound);
            return ExitCode::FAILURE;
        }
    };

    let result = run(cli, home);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code().clamp(0, 255) as u8)
        }
    }
}

fn run(cli: Cli, home: PathBuf) -> Result<()> {
    // Precedence: --cache-dir > COPILOT_PLUGINS_DIR > config.toml
    let cache_override = match cli.cache_dir {
        Some(dir) => Some(dir),
        None => match env::var_os(PLUGINS_DIR_ENV) {
            Some(dir) => Some(PathBuf::from(dir)),
            None => Config::load(&home.join(".copilot"))?.marketplace.cache_dir,
        },
    };

    let service = MarketplaceService::new(home, cache_override);

    match cli.command {
        Commands::Marketplace { action } => handle_marketplace(action, &service),
        Commands::Plugin { action } => handle_plugin(action, &service),
        Commands::Completions { shell } => {
            handle_completions(shell);
            Ok(())
        }
    }
}

// ========== Marketplace commands ==========

fn handle_marketplace(action: MarketplaceAction, service: &MarketplaceService) -> Result<()> {
    match action {
        MarketplaceAction::Add { source } => {
            let name = service.add_marketplace(&source)?;
            println!(
                "{} Marketplace '{}' added successfully.",
                "[OK]".green().bold(),
                name.bold()
            );
            Ok(())
        }
        MarketplaceAction::List => {
            let marketplaces = service.get_marketplaces()?;
            if marketplaces.is_empty() {
                println!("No marketplaces found. Please add a marketplace repository first.");
                return Ok(());
            }
            for listing in marketplaces {
                match listing.description {
                    Some(description) => {
                        println!("{}  {}", listing.name.bold(), description.dimmed())
                    }
                    None => println!("{}", listing.name.bold()),
                }
            }
            Ok(())
        }
        MarketplaceAction::Update { name } => {
            let Some(name) = resolve_marketplace_name(name, service, "Select a marketplace to update")?
            else {
                return Ok(());
            };

            match service.update_marketplace(&name) {
                Ok(()) => {
                    println!(
                        "{} Marketplace '{}' updated.",
                        "[OK]".green().bold(),
                        name.bold()
                    );
                    Ok(())
                }
                Err(MarketError::NotAGitRepo) => {
                    // Benign: local marketplaces have nothing to pull.
                    println!(
                        "{} Marketplace '{}' is not version-controlled; update only works \
                         for marketplaces added from a git URL.",
                        "[SKIP]".yellow().bold(),
                        name.bold()
                    );
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        MarketplaceAction::Remove { name, yes } => {
            let Some(name) = resolve_marketplace_name(name, service, "Select a marketplace to remove")?
            else {
                return Ok(());
            };

            if !yes && !TerminalPrompt.confirm(&format!("Remove marketplace '{name}'?")) {
                return Ok(());
            }

            service.remove_marketplace(&name)?;
            println!(
                "{} Marketplace '{}' has been successfully removed.",
                "[OK]".green().bold(),
                name.bold()
            );
            Ok(())
        }
    }
}

/// Resolve a marketplace name, interactively when not given. `None` means
/// the user cancelled (not an error).
fn resolve_marketplace_name(
    name: Option<String>,
    service: &MarketplaceService,
    prompt: &str,
) -> Result<Option<String>> {
    if let Some(name) = name {
        return Ok(Some(name));
    }

    let marketplaces = service.get_marketplaces()?;
    if marketplaces.is_empty() {
        println!("No marketplaces found. Please add a marketplace repository first.");
        return Ok(None);
    }

    let items: Vec<SelectItem> = marketplaces
        .iter()
        .map(|m| SelectItem {
            label: m.name.clone(),
            description: None,
            detail: m.description.clone(),
        })
        .collect();

    Ok(TerminalPrompt
        .select(&items, prompt)
        .map(|i| marketplaces[i].name.clone()))
}

// ========== Plugin commands ==========

fn handle_plugin(action: PluginAction, service: &MarketplaceService) -> Result<()> {
    let aggregator = PluginAggregator::new(service.store().clone());

    match action {
        PluginAction::List => {
            let plugins = aggregator.get_all_plugins()?;
            if plugins.is_empty() {
                println!("No plugins found. Please add a marketplace first.");
                return Ok(());
            }
            for plugin in plugins {
                let marketplace = format!("[{}]", plugin.marketplace_name);
                match plugin.description {
                    Some(description) => println!(
                        "{} {}  {}",
                        plugin.name.bold(),
                        marketplace.cyan(),
                        description.dimmed()
                    ),
                    None => println!("{} {}", plugin.name.bold(), marketplace.cyan()),
                }
            }
            Ok(())
        }
        PluginAction::Install {
            name,
            workspace,
            force,
        } => {
            let plugins = aggregator.get_all_plugins()?;
            if plugins.is_empty() {
                println!("No plugins found. Please add a marketplace first.");
                return Ok(());
            }

            let Some(plugin) = pick_plugin(name, &plugins)? else {
                return Ok(());
            };

            let workspace = match workspace {
                Some(path) => Some(path),
                None => env::current_dir().ok(),
            };

            let installer = PluginInstaller::new(service.store().clone(), workspace);
            let summary = if force {
                installer.install_plugin(&plugin, &AlwaysConfirm)?
            } else {
                installer.install_plugin(&plugin, &TerminalPrompt)?
            };

            println!("{} {}", "[OK]".green().bold(), summary.message(&plugin.name));
            Ok(())
        }
    }
}

/// Pick a plugin by (optionally marketplace-qualified) name, or
/// interactively. `None` means the user cancelled.
fn pick_plugin(name: Option<String>, plugins: &[Plugin]) -> Result<Option<Plugin>> {
    let Some(name) = name else {
        let items: Vec<SelectItem> = plugins
            .iter()
            .map(|p| SelectItem {
                label: p.name.clone(),
                description: Some(format!("[{}]", p.marketplace_name)),
                detail: p.description.clone(),
            })
            .collect();

        return Ok(TerminalPrompt
            .select(&items, "Select a plugin to install")
            .map(|i| plugins[i].clone()));
    };

    let (plugin_name, marketplace) = match name.split_once('@') {
        Some((p, m)) => (p, Some(m)),
        None => (name.as_str(), None),
    };

    plugins
        .iter()
        .find(|p| {
            p.name == plugin_name
                && marketplace.map_or(true, |m| p.marketplace_name == m)
        })
        .cloned()
        .map(Some)
        .ok_or(MarketError::PluginNotFound { name })
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    let mut stdout = io::stdout();

    match shell {
        Shell::Bash => generate(clap_complete::shells::Bash, &mut cmd, bin_name, &mut stdout),
        Shell::Zsh => generate(clap_complete::shells::Zsh, &mut cmd, bin_name, &mut stdout),
        Shell::Fish => generate(clap_complete::shells::Fish, &mut cmd, bin_name, &mut stdout),
        Shell::PowerShell => generate(
            clap_complete::shells::PowerShell,
            &mut cmd,
            bin_name,
            &mut stdout,
        ),
        Shell::Elvish => generate(
            clap_complete::shells::Elvish,
            &mut cmd,
            bin_name,
            &mut stdout,
        ),
    }
}

// ========== Terminal prompt implementations ==========

/// Numbered stdin selection and y/N confirmation
struct TerminalPrompt;

impl Selector for TerminalPrompt {
    fn select(&self, items: &[SelectItem], prompt: &str) -> Option<usize> {
        println!("{prompt}:");
        for (i, item) in items.iter().enumerate() {
            let mut line = format!("  {}. {}", i + 1, item.label.as_str().bold());
            if let Some(description) = &item.description {
                line.push_str(&format!(" {}", description.as_str().cyan()));
            }
            if let Some(detail) = &item.detail {
                line.push_str(&format!("  {}", detail.as_str().dimmed()));
            }
            println!("{line}");
        }

        print!("Enter a number (empty to cancel): ");
        io::stdout().flush().ok()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input).ok()?;
        let choice: usize = input.trim().parse().ok()?;
        choice.checked_sub(1).filter(|i| *i < items.len())
    }
}

impl Confirmer for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N]: ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// --force: overwrite without asking
struct AlwaysConfirm;

impl Confirmer for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
