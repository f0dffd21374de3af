//! provgen command-line entry point.

use anyhow::Result;
use clap::Parser;
use provgen::cli;
use provgen::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
