//! Plugin aggregation and workspace installation
//!
//! Aggregation flattens every registered marketplace's cached manifest into
//! one sorted plugin list. Installation copies a plugin's category folders
//! into the workspace's hidden content root, asking before overwriting any
//! pre-existing destination folder.

use std::path::{Path, PathBuf};

use crate::error::{MarketError, Result};
use crate::fetch::read_manifest;
use crate::install::copy_dir_recursive;
use crate::prompt::Confirmer;
use crate::registry::RegistryStore;
use crate::types::Plugin;

/// Plugin folder name -> workspace destination folder name
pub const CATEGORY_DESTINATIONS: &[(&str, &str)] = &[
    ("skills", "skills"),
    ("agents", "agents"),
    ("commands", "prompts"),
    ("instructions", "instructions"),
];

/// Hidden root for installed plugin content inside a workspace
pub const WORKSPACE_CONTENT_DIR: &str = ".github";

/// Aggregates plugins across all registered marketplaces
pub struct PluginAggregator {
    store: RegistryStore,
}

impl PluginAggregator {
    pub fn new(store: RegistryStore) -> Self {
        Self { store }
    }

    /// Flatten every marketplace's plugin list, attaching the owning
    /// marketplace name. A marketplace whose cached manifest cannot be read
    /// is skipped, never aborting the aggregate. Sorted case-insensitively
    /// by plugin name, stable within equal names.
    pub fn get_all_plugins(&self) -> Result<Vec<Plugin>> {
        let registry = self.store.load();

        let mut names: Vec<&String> = registry.keys().collect();
        names.sort();

        let mut plugins = Vec::new();
        for name in names {
            let entry = &registry[name];
            let Ok(manifest) = read_manifest(Path::new(&entry.install_location)) else {
                continue;
            };

            plugins.extend(
                manifest
                    .plugins
                    .iter()
                    .map(|p| Plugin::from_entry(p, name)),
            );
        }

        plugins.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(plugins)
    }
}

/// Result of one plugin installation
#[derive(Debug, Default, PartialEq)]
pub struct InstallSummary {
    /// Category folders actually copied, in mapping order
    pub installed: Vec<String>,
}

impl InstallSummary {
    /// Summary line for display
    pub fn message(&self, plugin_name: &str) -> String {
        if self.installed.is_empty() {
            format!("Plugin '{plugin_name}': no content folders to install")
        } else {
            format!(
                "Plugin '{plugin_name}' installed: {}",
                self.installed.join(", ")
            )
        }
    }
}

/// Installs a plugin's content folders into the active workspace
pub struct PluginInstaller {
    store: RegistryStore,
    workspace: Option<PathBuf>,
}

impl PluginInstaller {
    pub fn new(store: RegistryStore, workspace: Option<PathBuf>) -> Self {
        Self { store, workspace }
    }

    /// Copy each category folder present under the plugin's source into the
    /// workspace. A pre-existing destination folder asks the confirmer;
    /// declining skips that category only.
    pub fn install_plugin(&self, plugin: &Plugin, confirmer: &dyn Confirmer) -> Result<InstallSummary> {
        let workspace = self
            .workspace
            .as_deref()
            .ok_or(MarketError::NoWorkspaceFolder)?;

        let registry = self.store.load();
        let entry = registry.get(&plugin.marketplace_name).ok_or_else(|| {
            MarketError::MarketplaceNotFound {
                name: plugin.marketplace_name.clone(),
            }
        })?;

        let source_root = Path::new(&entry.install_location)
            .join(plugin.source.trim_start_matches("./"));

        let mut summary = InstallSummary::default();
        for (category, destination) in CATEGORY_DESTINATIONS {
            let category_src = source_root.join(category);
            if !category_src.is_dir() {
                continue;
            }

            let category_dst = workspace.join(WORKSPACE_CONTENT_DIR).join(destination);
            if category_dst.exists() {
                let prompt = format!(
                    "Folder '{destination}' already exists in the workspace. \
                     Overwrite with '{category}' from plugin '{}'?",
                    plugin.name
                );
                if !confirmer.confirm(&prompt) {
                    continue;
                }
            }

            copy_dir_recursive(&category_src, &category_dst)?;
            summary.installed.push((*category).to_string());
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MANIFEST_SUBPATH;
    use crate::prompt::NoPrompt;
    use crate::types::{EntrySource, Registry, RegistryEntry, SourceKind};
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    /// Confirmer with a scripted answer and a call counter
    struct ScriptedConfirm {
        answer: bool,
        asked: Cell<usize>,
    }

    impl ScriptedConfirm {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                asked: Cell::new(0),
            }
        }
    }

    impl Confirmer for ScriptedConfirm {
        fn confirm(&self, _prompt: &str) -> bool {
            self.asked.set(self.asked.get() + 1);
            self.answer
        }
    }

    fn register_marketplace(store: &RegistryStore, name: &str, location: &Path, manifest: &str) {
        fs::create_dir_all(location.join(".copilot-plugin")).unwrap();
        fs::write(location.join(MANIFEST_SUBPATH), manifest).unwrap();

        let mut registry: Registry = store.load();
        registry.insert(
            name.to_string(),
            RegistryEntry {
                source: EntrySource {
                    kind: SourceKind::Directory,
                    identifier: format!("local/{name}"),
                },
                install_location: location.to_string_lossy().to_string(),
                last_updated: "2025-01-01T00:00:00Z".to_string(),
            },
        );
        store.save(&registry).unwrap();
    }

    fn plugin(name: &str, source: &str, marketplace: &str) -> Plugin {
        Plugin {
            name: name.to_string(),
            source: source.to_string(),
            marketplace_name: marketplace.to_string(),
            description: None,
            version: None,
        }
    }

    #[test]
    fn test_aggregate_across_marketplaces() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));

        register_marketplace(
            &store,
            "mp1",
            &temp.path().join("cache/mp1"),
            r#"{"name": "mp1", "owner": {"name": "me"}, "plugins": [
                {"name": "plugin1", "source": "./p1"},
                {"name": "plugin2", "source": "./p2"}
            ]}"#,
        );
        register_marketplace(
            &store,
            "mp2",
            &temp.path().join("cache/mp2"),
            r#"{"name": "mp2", "owner": {"name": "me"}, "plugins": [
                {"name": "plugin3", "source": "./p3"}
            ]}"#,
        );

        let plugins = PluginAggregator::new(store).get_all_plugins().unwrap();
        assert_eq!(plugins.len(), 3);
        assert_eq!(plugins[0].marketplace_name, "mp1");
        assert_eq!(plugins[2].name, "plugin3");
        assert_eq!(plugins[2].marketplace_name, "mp2");
    }

    #[test]
    fn test_aggregate_sorts_case_insensitively() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));

        register_marketplace(
            &store,
            "mp1",
            &temp.path().join("cache/mp1"),
            r#"{"name": "mp1", "owner": {"name": "me"}, "plugins": [
                {"name": "banana", "source": "./b"},
                {"name": "Apple", "source": "./a"},
                {"name": "cherry", "source": "./c"}
            ]}"#,
        );

        let plugins = PluginAggregator::new(store).get_all_plugins().unwrap();
        let names: Vec<&str> = plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_aggregate_skips_broken_marketplace() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));

        register_marketplace(
            &store,
            "good",
            &temp.path().join("cache/good"),
            r#"{"name": "good", "owner": {"name": "me"}, "plugins": [
                {"name": "p1", "source": "./p1"}
            ]}"#,
        );
        register_marketplace(&store, "bad", &temp.path().join("cache/bad"), "{ broken");

        let plugins = PluginAggregator::new(store).get_all_plugins().unwrap();
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].marketplace_name, "good");
    }

    #[test]
    fn test_aggregate_empty_registry() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));
        assert!(PluginAggregator::new(store)
            .get_all_plugins()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_install_requires_workspace() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));

        let installer = PluginInstaller::new(store, None);
        let err = installer
            .install_plugin(&plugin("p1", "./p1", "mp1"), &NoPrompt)
            .unwrap_err();
        assert!(matches!(err, MarketError::NoWorkspaceFolder));
        assert_eq!(err.to_string(), "No workspace folder");
    }

    #[test]
    fn test_install_copies_without_prompt_when_destination_absent() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));
        let location = temp.path().join("cache/mp1");
        register_marketplace(
            &store,
            "mp1",
            &location,
            r#"{"name": "mp1", "owner": {"name": "me"}, "plugins": []}"#,
        );
        fs::create_dir_all(location.join("p1/skills")).unwrap();
        fs::write(location.join("p1/skills/s.md"), "skill").unwrap();

        let workspace = temp.path().join("workspace");
        fs::create_dir_all(&workspace).unwrap();

        let confirm = ScriptedConfirm::new(false);
        let installer = PluginInstaller::new(store, Some(workspace.clone()));
        let summary = installer
            .install_plugin(&plugin("p1", "./p1", "mp1"), &confirm)
            .unwrap();

        assert_eq!(confirm.asked.get(), 0, "no prompt without a conflict");
        assert_eq!(summary.installed, ["skills"]);
        assert!(workspace.join(".github/skills/s.md").exists());
    }

    #[test]
    fn test_install_declined_overwrite_copies_nothing() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));
        let location = temp.path().join("cache/mp1");
        register_marketplace(
            &store,
            "mp1",
            &location,
            r#"{"name": "mp1", "owner": {"name": "me"}, "plugins": []}"#,
        );
        fs::create_dir_all(location.join("p1/skills")).unwrap();
        fs::write(location.join("p1/skills/s.md"), "new skill").unwrap();

        let workspace = temp.path().join("workspace");
        fs::create_dir_all(workspace.join(".github/skills")).unwrap();
        fs::write(workspace.join(".github/skills/old.md"), "old").unwrap();

        let confirm = ScriptedConfirm::new(false);
        let installer = PluginInstaller::new(store, Some(workspace.clone()));
        let summary = installer
            .install_plugin(&plugin("p1", "./p1", "mp1"), &confirm)
            .unwrap();

        assert_eq!(confirm.asked.get(), 1);
        assert!(summary.installed.is_empty());
        assert!(!workspace.join(".github/skills/s.md").exists());
        assert!(workspace.join(".github/skills/old.md").exists());
    }

    #[test]
    fn test_install_confirmed_overwrite_copies() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));
        let location = temp.path().join("cache/mp1");
        register_marketplace(
            &store,
            "mp1",
            &location,
            r#"{"name": "mp1", "owner": {"name": "me"}, "plugins": []}"#,
        );
        fs::create_dir_all(location.join("p1/skills")).unwrap();
        fs::write(location.join("p1/skills/s.md"), "new skill").unwrap();

        let workspace = temp.path().join("workspace");
        fs::create_dir_all(workspace.join(".github/skills")).unwrap();

        let confirm = ScriptedConfirm::new(true);
        let installer = PluginInstaller::new(store, Some(workspace.clone()));
        let summary = installer
            .install_plugin(&plugin("p1", "./p1", "mp1"), &confirm)
            .unwrap();

        assert_eq!(summary.installed, ["skills"]);
        assert!(workspace.join(".github/skills/s.md").exists());
    }

    #[test]
    fn test_install_category_mapping() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));
        let location = temp.path().join("cache/mp1");
        register_marketplace(
            &store,
            "mp1",
            &location,
            r#"{"name": "mp1", "owner": {"name": "me"}, "plugins": []}"#,
        );
        for category in ["skills", "agents", "commands", "instructions"] {
            fs::create_dir_all(location.join("p1").join(category)).unwrap();
            fs::write(location.join("p1").join(category).join("f.md"), category).unwrap();
        }

        let workspace = temp.path().join("workspace");
        fs::create_dir_all(&workspace).unwrap();

        let installer = PluginInstaller::new(store, Some(workspace.clone()));
        let summary = installer
            .install_plugin(&plugin("p1", "./p1", "mp1"), &NoPrompt)
            .unwrap();

        assert_eq!(
            summary.installed,
            ["skills", "agents", "commands", "instructions"]
        );
        // commands lands under prompts; the rest keep their names
        assert!(workspace.join(".github/skills/f.md").exists());
        assert!(workspace.join(".github/agents/f.md").exists());
        assert!(workspace.join(".github/prompts/f.md").exists());
        assert!(workspace.join(".github/instructions/f.md").exists());
        assert!(!workspace.join(".github/commands").exists());
    }

    #[test]
    fn test_install_with_no_category_folders_is_empty_summary() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::with_path(temp.path().join("known_marketplaces.json"));
        let location = temp.path().join("cache/mp1");
        register_marketplace(
            &store,
            "mp1",
            &location,
            r#"{"name": "mp1", "owner": {"name": "me"}, "plugins": []}"#,
        );
        fs::create_dir_all(location.join("p1/docs")).unwrap();

        let workspace = temp.path().join("workspace");
        fs::create_dir_all(&workspace).unwrap();

        let installer = PluginInstaller::new(store, Some(workspace));
        let summary = installer
            .install_plugin(&plugin("p1", "./p1", "mp1"), &NoPrompt)
            .unwrap();

        assert!(summary.installed.is_empty());
        assert!(summary.message("p1").contains("no content folders"));
    }

    #[test]
    fn test_summary_message_lists_categories() {
        let summary = InstallSummary {
            installed: vec!["skills".to_string(), "agents".to_string()],
        };
        let message = summary.message("p1");
        assert!(message.to_lowercase().contains("installed"));
        assert!(message.contains("skills"));
        assert!(message.contains("agents"));
    }
}
