//! Git remote lookup for set-package-repo
//!
//! Lists the remotes of the checkout containing a manifest and picks the one
//! the manifest should point at. Only reads repository config, never fetches.

use git2::{Repository, RepositoryOpenFlags};
use std::ffi::OsStr;
use std::path::Path;

mod url;

pub use url::{canonical_url, github_ssh_to_https};

/// Name of the preferred remote
pub const ORIGIN: &str = "origin";

/// A configured git remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    /// Remote name, e.g. `origin`
    pub name: String,

    /// URL used for fetching
    pub fetch_url: String,

    /// URL used for pushing when it differs from the fetch URL
    pub push_url: Option<String>,
}

impl RemoteDescriptor {
    pub fn new(name: impl Into<String>, fetch_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fetch_url: fetch_url.into(),
            push_url: None,
        }
    }

    pub fn with_push_url(mut self, push_url: impl Into<String>) -> Self {
        self.push_url = Some(push_url.into());
        self
    }

    /// The URL to publish: push URL first, fetch URL otherwise
    pub fn url(&self) -> &str {
        self.push_url.as_deref().unwrap_or(&self.fetch_url)
    }
}

/// Why no remote could be selected for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteLookupError {
    /// The path is not inside a git checkout
    NotInitialised,
    /// The checkout has no remotes configured
    NoRemotes,
}

/// Source of remote information for a local checkout
pub trait RemoteSource {
    /// List the remotes of the checkout containing `dir`, in the order git
    /// reports them. An empty list means the checkout has no remotes.
    fn remotes_for(&self, dir: &Path) -> Result<Vec<RemoteDescriptor>, RemoteLookupError>;
}

/// Reads remotes from the repository config with git2
///
/// Discovery honours `GIT_DIR` and `GIT_CEILING_DIRECTORIES` the same way
/// the git command line does.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitRemotes;

impl RemoteSource for GitRemotes {
    fn remotes_for(&self, dir: &Path) -> Result<Vec<RemoteDescriptor>, RemoteLookupError> {
        let ceilings: [&OsStr; 0] = [];
        let repo = Repository::open_ext(dir, RepositoryOpenFlags::FROM_ENV, ceilings).map_err(|e| {
            tracing::debug!("No git repository found for {}: {}", dir.display(), e);
            RemoteLookupError::NotInitialised
        })?;

        let names = repo.remotes().map_err(|e| {
            tracing::debug!("Failed to list remotes for {}: {}", dir.display(), e);
            RemoteLookupError::NotInitialised
        })?;

        let mut remotes = Vec::with_capacity(names.len());
        for name in names.iter().flatten() {
            let remote = repo.find_remote(name).map_err(|e| {
                tracing::debug!("Failed to read remote '{}': {}", name, e);
                RemoteLookupError::NotInitialised
            })?;

            remotes.push(RemoteDescriptor {
                name: name.to_string(),
                fetch_url: String::from_utf8_lossy(remote.url_bytes()).into_owned(),
                push_url: remote
                    .pushurl_bytes()
                    .map(|url| String::from_utf8_lossy(url).into_owned()),
            });
        }

        tracing::trace!("Remotes for {}: {:?}", dir.display(), remotes);
        Ok(remotes)
    }
}

/// Pick the remote for `dir`: `origin` when present, else the first listed
pub fn find_origin_remote<S: RemoteSource + ?Sized>(
    source: &S,
    dir: &Path,
) -> Result<RemoteDescriptor, RemoteLookupError> {
    let mut remotes = source.remotes_for(dir)?;
    if remotes.is_empty() {
        return Err(RemoteLookupError::NoRemotes);
    }

    let index = remotes
        .iter()
        .position(|remote| remote.name == ORIGIN)
        .unwrap_or(0);
    Ok(remotes.swap_remove(index))
}
