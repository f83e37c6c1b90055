//! Configuration file support for skiff.
//!
//! skiff reads two configuration files:
//! - Global: `~/.skiff/config.toml` - User-wide defaults
//! - Project: `.skiff/config.toml` - Overrides for one source tree
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// skiff configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Toolchain binary overrides
    pub toolchain: ToolchainSettings,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Target architecture when neither `--arch` nor GOARCH is set
    pub arch: Option<String>,

    /// Additional include paths passed to the compiler and linker
    pub include_paths: Vec<PathBuf>,

    /// Build each executable from its entry file alone
    pub single_main: bool,

    /// Default output path (directory if it ends in `/`)
    pub output: Option<String>,
}

/// Toolchain binary overrides.
///
/// Bare names are looked up on PATH; paths are used as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Compiler binary (e.g. /usr/local/go/bin/6g)
    pub compiler: Option<PathBuf>,

    /// Linker binary
    pub linker: Option<PathBuf>,

    /// Archiver binary
    pub archiver: Option<PathBuf>,

    /// Shell used by `--clean`
    pub shell: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("ignoring invalid configuration: {:#}", e);
            Self::default()
        })
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.arch.is_some() {
            self.build.arch = other.build.arch;
        }
        if !other.build.include_paths.is_empty() {
            self.build.include_paths = other.build.include_paths;
        }
        if other.build.single_main {
            self.build.single_main = true;
        }
        if other.build.output.is_some() {
            self.build.output = other.build.output;
        }

        if other.toolchain.compiler.is_some() {
            self.toolchain.compiler = other.toolchain.compiler;
        }
        if other.toolchain.linker.is_some() {
            self.toolchain.linker = other.toolchain.linker;
        }
        if other.toolchain.archiver.is_some() {
            self.toolchain.archiver = other.toolchain.archiver;
        }
        if other.toolchain.shell.is_some() {
            self.toolchain.shell = other.toolchain.shell;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.skiff/config.toml)
/// 2. Global config (~/.skiff/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));
    config
}

/// Get the global skiff config directory (~/.skiff).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".skiff"))
}

/// Get the global config path (~/.skiff/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.skiff/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".skiff").join("config.toml")
}
