//! # set-package-repo
//!
//! Sets the `repository` and `homepage` fields of a `package.json` from the
//! origin remote of the git checkout it lives in.
//!
//! - **SSH to HTTPS**: `git@github.com:owner/repo.git` is recorded as
//!   `https://github.com/owner/repo`
//! - **Idempotent**: a manifest that is already correct is never rewritten
//! - **Safe**: existing values that differ are only replaced with `--force`
//! - **Format preserving**: key order and indentation survive the rewrite
//!
//! ## Quick Start
//!
//! ```bash
//! # Point package.json at the origin remote
//! set-package-repo package.json
//!
//! # Replace existing values, leave homepage alone
//! set-package-repo --force --no-homepage packages/*/package.json
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use set_package_repo::{SyncOptions, synchronize};
//! use std::path::Path;
//!
//! let report = synchronize(Path::new("package.json"), &SyncOptions::default())?;
//! if let Some(message) = report.message {
//!     println!("{message}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod git;
pub mod manifest;
pub mod sync;
pub mod tools;

pub use cli::{Cli, Output};
pub use config::SyncConfig;
pub use sync::{SyncOptions, SyncReport, Synchronizer, synchronize};

/// Result type alias for set-package-repo operations
pub type Result<T> = anyhow::Result<T>;
