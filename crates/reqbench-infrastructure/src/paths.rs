//! Path management for reqbench files.
//!
//! ```text
//! ~/.config/reqbench/          # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/reqbench/     # Data directory
//! └── history.toml             # Persisted request history
//! ```
//!
//! Passing a base directory roots both trees under it (tests, portable
//! installs).

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "reqbench";

/// Resolves reqbench directories, optionally under an explicit base.
#[derive(Debug, Clone, Default)]
pub struct ReqbenchPaths {
    base_dir: Option<PathBuf>,
}

impl ReqbenchPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the config directory (e.g. `~/.config/reqbench/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .context("Cannot find config directory"),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/reqbench/`).
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .context("Cannot find data directory"),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Path of the history file named `file_name` in the data directory.
    pub fn history_file(&self, file_name: &str) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(file_name))
    }
}
