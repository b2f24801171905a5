//! vdev - manage iOS simulators and Android emulators from one CLI
//!
//! This is the binary entry point; the command surface lives in `cli` and
//! the handlers (plus the composition root) in `commands`.

use clap::Parser;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    // File logging is best-effort; the CLI must work without it
    if let Err(err) = vdev_core::logging::init() {
        eprintln!("Warning: could not initialize logging: {err}");
    }

    let cli = cli::Cli::parse();

    if let Err(err) = commands::run(cli).await {
        tracing::debug!("command failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
