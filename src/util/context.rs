//! Global context for skiff operations.
//!
//! Provides centralized access to the build root and configuration paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Process-wide context: where the build runs and where configuration lives.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Build root; sources are discovered below it and artifacts land in it
    cwd: PathBuf,

    /// Global configuration file, if a home directory is known
    global_config: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a context rooted at the current working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context rooted at a specific directory.
    ///
    /// The global configuration is ignored so results only depend on the tree.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            global_config: None,
        }
    }

    /// Read the user-wide configuration as well.
    pub fn with_global_config(mut self) -> Self {
        self.global_config = global_config_path();
        self
    }

    /// Get the build root.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the project-local skiff directory.
    pub fn project_skiff_dir(&self) -> PathBuf {
        self.cwd.join(".skiff")
    }

    /// Load global and project configuration, project winning.
    pub fn load_config(&self) -> Config {
        let config = load_config(self.global_config.as_deref(), &project_config_path(&self.cwd));
        tracing::debug!("loaded configuration: {:?}", config);
        config
    }
}
