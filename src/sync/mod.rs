//! Repository field synchronization
//!
//! Points the `repository` and `homepage` fields of a package.json at the git
//! remote of the checkout that contains it. Expected outcomes such as a
//! missing remote or a conflicting value come back as a [`SyncReport`];
//! only environment and parse problems are errors.

use anyhow::Result;
use std::path::Path;

use crate::git::{GitRemotes, RemoteLookupError, RemoteSource, canonical_url, find_origin_remote};
use crate::manifest::Manifest;
use crate::tools::{self, DEFAULT_REQUIRED_TOOLS};

/// Per-call options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Overwrite values that differ from the remote
    pub force: bool,

    /// Also manage the homepage field
    pub homepage: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force: false,
            homepage: true,
        }
    }
}

/// Outcome of synchronizing one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub success: bool,
    pub message: Option<String>,
}

impl SyncReport {
    pub fn success(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Synchronizes manifests against the remotes reported by `S`
pub struct Synchronizer<S = GitRemotes> {
    required_tools: Vec<String>,
    remotes: S,
}

impl Synchronizer<GitRemotes> {
    /// Synchronizer backed by the git checkout on disk
    pub fn new(required_tools: Vec<String>) -> Self {
        Self::with_remote_source(required_tools, GitRemotes)
    }
}

impl Default for Synchronizer<GitRemotes> {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_TOOLS.iter().map(|t| t.to_string()).collect())
    }
}

impl<S: RemoteSource> Synchronizer<S> {
    pub fn with_remote_source(required_tools: Vec<String>, remotes: S) -> Self {
        Self {
            required_tools,
            remotes,
        }
    }

    /// Bring the manifest at `manifest_path` in line with its git remote.
    ///
    /// The file is written at most once, and only when something changes.
    /// Every soft failure leaves it untouched.
    pub fn synchronize(&self, manifest_path: &Path, options: &SyncOptions) -> Result<SyncReport> {
        tools::require_tools(&self.required_tools)?;

        let mut manifest = Manifest::load(manifest_path)?;
        let path = manifest.path().display().to_string();

        let remote = match find_origin_remote(&self.remotes, manifest.directory()) {
            Ok(remote) => remote,
            Err(RemoteLookupError::NotInitialised) => {
                return Ok(SyncReport::failure(format!(
                    "{path} does not appear to be within an initialised git repository"
                )));
            }
            Err(RemoteLookupError::NoRemotes) => {
                return Ok(SyncReport::failure(format!(
                    "no remotes have been set up for the repository containing '{path}'"
                )));
            }
        };

        let url = canonical_url(&remote);
        tracing::debug!("Using remote '{}' for {}: {}", remote.name, path, url);

        let mut repo_already_set = false;
        if let Some(current) = manifest.repository() {
            if manifest.repository_matches(&url) {
                repo_already_set = true;
            } else if !options.force {
                return Ok(SyncReport::failure(format!(
                    "repository info is already set in '{path}' ({current}) - run with --force to overwrite"
                )));
            }
        }

        let mut homepage_already_set = false;
        if options.homepage {
            if let Some(current) = manifest.homepage() {
                if manifest.homepage_matches(&url) {
                    homepage_already_set = true;
                } else if !options.force {
                    let current = current.as_str().map_or_else(|| current.to_string(), str::to_string);
                    return Ok(SyncReport::failure(format!(
                        "homepage is already set in '{path}' ({current}) - run with --force to overwrite"
                    )));
                }
            }

            if repo_already_set && homepage_already_set {
                tracing::debug!("Nothing to change in {}", path);
                return Ok(SyncReport::success(Some(format!(
                    "homepage and repo already set in '{path}'"
                ))));
            }

            manifest.set_homepage(&url);
        }

        manifest.set_repository(&url);
        manifest.save()?;

        let message = if repo_already_set {
            Some(format!("repo already set in '{path}', homepage set to '{url}'"))
        } else if homepage_already_set {
            Some(format!("homepage already set in '{path}', repo set to '{url}'"))
        } else {
            None
        };

        Ok(SyncReport::success(message))
    }
}

/// Synchronize one manifest using the default tool checks and git on disk
pub fn synchronize(manifest_path: &Path, options: &SyncOptions) -> Result<SyncReport> {
    Synchronizer::default().synchronize(manifest_path, options)
}
