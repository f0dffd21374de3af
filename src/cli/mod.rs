//! Command-line interface for provgen.
//!
//! # Available Commands
//!
//! - `generate` - provider specifications for components and domains
//! - `sites` - list the injection sites reachable from each component
//! - `tree` - print the injection graph of a component
//! - `expand` - expand a `${env.*}`/`${sys.*}` name template
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - errors only
//! - `--config` - path to a `provgen.toml`
//!
//! ```bash
//! provgen generate model/ --domain env
//! provgen tree model/ --component com.acme.AppComponent
//! provgen expand 'db.${env.STAGE:-dev}.url'
//! ```

pub mod common;
mod expand;
mod generate;
mod sites;
mod tree;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::GeneratorConfig;

#[derive(Parser, Debug)]
#[command(
    name = "provgen",
    about = "Generate configuration providers for dependency-injection graphs",
    version,
    long_about = "provgen walks the injection graph of each component, groups qualified \
                  configuration sites by parameter and emits one provider per distinct \
                  type, name and default."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a provgen.toml configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate provider specifications
    Generate(generate::GenerateCommand),

    /// List injection sites reachable from each component
    Sites(sites::SitesCommand),

    /// Print the injection graph of a component
    Tree(tree::TreeCommand),

    /// Expand a qualifier name template
    Expand(expand::ExpandCommand),
}

impl Cli {
    /// The tracing filter implied by the global flags.
    ///
    /// `RUST_LOG` applies only when neither `--verbose` nor `--quiet` is set.
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("provgen=debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    }

    pub fn execute(self) -> Result<()> {
        let config = GeneratorConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Generate(cmd) => cmd.execute(&config),
            Commands::Sites(cmd) => cmd.execute(),
            Commands::Tree(cmd) => cmd.execute(),
            Commands::Expand(cmd) => cmd.execute(&config),
        }
    }
}
