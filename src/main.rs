use anyhow::Result;
use clap::Parser;

use set_package_repo::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
