//! Required tool detection
//!
//! The synchronizer refuses to touch a manifest unless the package manager
//! and git are installed. Absence is an environment problem, reported as a
//! hard error rather than a per-file result.

use anyhow::{Result, anyhow};
use std::path::PathBuf;


/// Tools checked when nothing else is configured
pub const DEFAULT_REQUIRED_TOOLS: &[&str] = &["npm", "git"];

/// Check that every tool in `tools` can be found on PATH
pub fn require_tools<S: AsRef<str>>(tools: &[S]) -> Result<()> {
    for tool in tools {
        let path = require_tool(tool.as_ref())?;
        tracing::trace!("Found {} at {}", tool.as_ref(), path.display());
    }
    Ok(())
}

/// Locate a single tool on PATH
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name)
        .map_err(|_| anyhow!("Required commandline tool not found in environment: {}", name))
}
