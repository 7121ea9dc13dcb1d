//! Configuration management for set-package-repo
//!
//! Settings are layered with figment: the embedded defaults, then the user
//! config, then the repository config, then `SET_PACKAGE_REPO_*` environment
//! variables. Command-line flags are applied on top by the CLI.

use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sync::SyncOptions;
use crate::tools::DEFAULT_REQUIRED_TOOLS;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SET_PACKAGE_REPO_";

/// Repository-level config file, looked up in the working directory
pub const REPO_CONFIG_FILE: &str = "set-package-repo.toml";

/// Effective settings for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Overwrite repository/homepage values that differ from the git remote
    pub force: bool,

    /// Also set the homepage field
    pub homepage: bool,

    /// Executables that must be on PATH before a manifest is processed
    pub required_tools: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            force: false,
            homepage: true,
            required_tools: DEFAULT_REQUIRED_TOOLS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from the standard locations
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    /// Load configuration, replacing the user and repository files with
    /// `custom_config` when one is given
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                bail!("Config file not found: {}", custom_path.display());
            }
            figment = figment.merge(Toml::file(custom_path));
        } else {
            if let Some(user_path) = Self::user_config_path() {
                figment = figment.merge(Toml::file(user_path));
            }
            figment = figment.merge(Toml::file(REPO_CONFIG_FILE));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let config: SyncConfig = figment
            .extract()
            .context("Failed to load set-package-repo configuration")?;
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Options for the synchronizer as configured, before CLI flags
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            force: self.force,
            homepage: self.homepage,
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config/set-package-repo/config.toml"))
    }
}
