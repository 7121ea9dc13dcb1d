//! Command-line interface for set-package-repo
//!
//! Parses the manifest paths and flags, layers the flags over the loaded
//! configuration and runs the synchronizer on each file in turn.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

mod output;

pub use output::Output;

use crate::config::SyncConfig;
use crate::sync::{SyncOptions, Synchronizer};

/// Set package.json repository and homepage fields from the git origin remote
#[derive(Parser, Debug)]
#[command(name = "set-package-repo", author, version, about, long_about = None)]
#[command(after_help = "negate any boolean option by prepending --no-")]
pub struct Cli {
    /// Paths to package.json files to modify
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Force overwriting repository information
    #[arg(long, overrides_with = "no_force")]
    pub force: bool,

    /// Never overwrite existing repository information
    #[arg(long, overrides_with = "force")]
    pub no_force: bool,

    /// Also set the homepage field from the git repo url
    #[arg(long, overrides_with = "no_homepage")]
    pub homepage: bool,

    /// Leave the homepage field untouched
    #[arg(long, overrides_with = "homepage")]
    pub no_homepage: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        if self.files.is_empty() {
            output.error("Please provide one or more paths to package.json files to modify");
            return Ok(());
        }

        let config = SyncConfig::load_with_custom_config(self.config.as_deref())?;
        let options = self.options(&config);
        output.verbose(&format!(
            "force: {}, homepage: {}",
            options.force, options.homepage
        ));

        let synchronizer = Synchronizer::new(config.required_tools.clone());
        let mut failed = 0usize;

        for file in &self.files {
            output.step(&format!("update: {}", file.display()));

            if !file.is_file() {
                output.error(&format!("file not found: {}", file.display()));
                continue;
            }

            match synchronizer.synchronize(file, &options) {
                Ok(report) => {
                    if report.success {
                        output.success(&file.display().to_string());
                    } else {
                        output.error(&file.display().to_string());
                    }
                    if let Some(message) = &report.message {
                        output.report(message, report.success);
                    }
                }
                Err(e) => {
                    output.error(&format!("{}: {:#}", file.display(), e));
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            bail!("{} manifest(s) could not be processed", failed);
        }

        Ok(())
    }

    /// Resolve effective options: flags given on the command line win over config
    pub fn options(&self, config: &SyncConfig) -> SyncOptions {
        let mut options = config.options();
        if let Some(force) = flag(self.force, self.no_force) {
            options.force = force;
        }
        if let Some(homepage) = flag(self.homepage, self.no_homepage) {
            options.homepage = homepage;
        }
        options
    }
}

fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
