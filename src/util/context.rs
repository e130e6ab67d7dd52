//! Global context for Berth operations.
//!
//! Provides centralized access to the workspace location and
//! configuration paths.
//!
//! A workspace is a directory whose subdirectories are packages, each with
//! its own `Berth.toml`. When started inside a package directory, the
//! workspace is its parent and the package is the default target.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::MANIFEST_NAME;
use crate::core::package::WorkspaceLoader;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Directory holding the package directories
    workspace_root: PathBuf,
}

impl GlobalContext {
    /// Create a context for the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context for a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let workspace_root = infer_workspace_root(&cwd);
        GlobalContext {
            cwd,
            workspace_root,
        }
    }

    /// Use an explicit workspace root, relative to the working directory.
    pub fn with_workspace(mut self, root: &Path) -> Self {
        self.workspace_root = self.cwd.join(root);
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the workspace root.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Get the global configuration file path, if the platform has one.
    pub fn config_path(&self) -> Option<PathBuf> {
        global_config_path()
    }

    /// Get the workspace configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        project_config_path(&self.workspace_root)
    }

    /// Load global and workspace configuration, workspace winning.
    pub fn load_config(&self) -> Config {
        load_config(self.config_path().as_deref(), &self.project_config_path())
    }

    /// A loader for the packages of this workspace.
    pub fn loader(&self) -> WorkspaceLoader {
        WorkspaceLoader::new(&self.workspace_root)
    }

    /// The package the working directory belongs to, if any.
    pub fn current_package(&self) -> Option<String> {
        if !self.cwd.join(MANIFEST_NAME).is_file() {
            return None;
        }
        self.cwd
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Pick `explicit` or fall back to the current package.
    pub fn target_package(&self, explicit: Option<&str>) -> Result<String> {
        match explicit {
            Some(package) => Ok(package.to_string()),
            None => self.current_package().with_context(|| {
                format!(
                    "no package given and no {} in {}\n\
                     help: Pass a package name or run from inside a package directory",
                    MANIFEST_NAME,
                    self.cwd.display()
                )
            }),
        }
    }
}

fn infer_workspace_root(cwd: &Path) -> PathBuf {
    if cwd.join(MANIFEST_NAME).is_file() {
        if let Some(parent) = cwd.parent() {
            return parent.to_path_buf();
        }
    }
    cwd.to_path_buf()
}
