//! Git boundary
//!
//! Abstract client over the handful of git operations the engine needs.
//! `SystemGit` shells out to the `git` binary; tests substitute a
//! scriptable fake since this is the only non-deterministic dependency.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::error::{MarketError, Result};

/// Options for `clone_repo`
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneOptions {
    /// History depth (`--depth N`)
    pub depth: Option<u32>,
    /// Suppress working-tree checkout (`--no-checkout`)
    pub no_checkout: bool,
}

impl CloneOptions {
    /// Depth-1 clone with a working tree (full install)
    pub fn shallow() -> Self {
        Self {
            depth: Some(1),
            no_checkout: false,
        }
    }

    /// Depth-1 clone without a working tree (manifest-only fetch)
    pub fn shallow_no_checkout() -> Self {
        Self {
            depth: Some(1),
            no_checkout: true,
        }
    }
}

/// Abstract git client
pub trait GitClient {
    /// Clone `url` into `dest`
    fn clone_repo(&self, url: &str, dest: &Path, options: &CloneOptions) -> Result<()>;

    /// Selective checkout of `paths` at `refspec` inside `dest`
    fn checkout_paths(&self, dest: &Path, refspec: &str, paths: &[&str]) -> Result<()>;

    /// Pull the current branch inside `dest`
    fn pull(&self, dest: &Path) -> Result<()>;

    /// Whether `dest` is inside a git work tree
    fn is_repo(&self, dest: &Path) -> Result<bool>;

    /// Configured remote names for `dest`
    fn remotes(&self, dest: &Path) -> Result<Vec<String>>;
}

/// Real client shelling out to the `git` binary
#[derive(Debug, Default)]
pub struct SystemGit;

impl SystemGit {
    fn run(args: &[&str], cwd: Option<&Path>) -> Result<String> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MarketError::Git(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl GitClient for SystemGit {
    fn clone_repo(&self, url: &str, dest: &Path, options: &CloneOptions) -> Result<()> {
        fs::create_dir_all(dest.parent().unwrap_or(dest))?;

        let mut args = vec!["clone".to_string()];
        if let Some(depth) = options.depth {
            args.push("--depth".to_string());
            args.push(depth.to_string());
        }
        if options.no_checkout {
            args.push("--no-checkout".to_string());
        }
        args.push(url.to_string());
        args.push(dest.to_string_lossy().to_string());

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::run(&arg_refs, None)?;
        Ok(())
    }

    fn checkout_paths(&self, dest: &Path, refspec: &str, paths: &[&str]) -> Result<()> {
        let mut args = vec!["checkout", refspec, "--"];
        args.extend_from_slice(paths);
        Self::run(&args, Some(dest))?;
        Ok(())
    }

    fn pull(&self, dest: &Path) -> Result<()> {
        Self::run(&["pull"], Some(dest))?;
        Ok(())
    }

    fn is_repo(&self, dest: &Path) -> Result<bool> {
        let output = Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(dest)
            .output();

        match output {
            Ok(out) => Ok(out.status.success()),
            Err(_) => Ok(false),
        }
    }

    fn remotes(&self, dest: &Path) -> Result<Vec<String>> {
        let stdout = Self::run(&["remote"], Some(dest))?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Scriptable fake client shared by the git-touching test modules
#[cfg(test)]
pub mod tests_support {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    pub struct FakeGit {
        /// Manifest content written under each clone destination
        manifest: Option<String>,
        clone_error: Option<String>,
        pull_error: Option<String>,
        pub repo: bool,
        pub remote_names: Vec<String>,
        calls: RefCell<Vec<String>>,
        clone_dests: RefCell<Vec<PathBuf>>,
    }

    impl FakeGit {
        pub fn with_manifest(manifest: &str) -> Self {
            Self {
                manifest: Some(manifest.to_string()),
                ..Self::default()
            }
        }

        pub fn failing_clone(message: &str) -> Self {
            Self {
                clone_error: Some(message.to_string()),
                ..Self::default()
            }
        }

        pub fn repo_with_remote() -> Self {
            Self {
                repo: true,
                remote_names: vec!["origin".to_string()],
                ..Self::default()
            }
        }

        pub fn failing_pull(message: &str) -> Self {
            Self {
                pull_error: Some(message.to_string()),
                ..Self::repo_with_remote()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn last_clone_dest(&self) -> Option<PathBuf> {
            self.clone_dests.borrow().last().cloned()
        }
    }

    impl GitClient for FakeGit {
        fn clone_repo(&self, url: &str, dest: &Path, options: &CloneOptions) -> Result<()> {
            self.calls.borrow_mut().push(format!(
                "clone depth={} no_checkout={} {}",
                options.depth.map_or("full".to_string(), |d| d.to_string()),
                options.no_checkout,
                url
            ));
            self.clone_dests.borrow_mut().push(dest.to_path_buf());

            if let Some(message) = &self.clone_error {
                return Err(MarketError::Git(format!("git clone failed: {message}")));
            }

            if let Some(manifest) = &self.manifest {
                let manifest_path = dest.join(".copilot-plugin/marketplace.json");
                fs::create_dir_all(manifest_path.parent().unwrap())?;
                fs::write(manifest_path, manifest)?;
            }
            Ok(())
        }

        fn checkout_paths(&self, _dest: &Path, refspec: &str, paths: &[&str]) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("checkout {refspec} -- {}", paths.join(" ")));
            Ok(())
        }

        fn pull(&self, _dest: &Path) -> Result<()> {
            self.calls.borrow_mut().push("pull".to_string());
            if let Some(message) = &self.pull_error {
                return Err(MarketError::Git(message.clone()));
            }
            Ok(())
        }

        fn is_repo(&self, _dest: &Path) -> Result<bool> {
            Ok(self.repo)
        }

        fn remotes(&self, _dest: &Path) -> Result<Vec<String>> {
            Ok(self.remote_names.clone())
        }
    }
}
