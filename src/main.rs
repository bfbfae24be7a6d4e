//! xapk CLI - Install XAPK archives on Android devices
//!
//! Entry point for the xapk command-line application.

use anyhow::Result;
use clap::Parser;

use xapk::cli::output::display_error;
use xapk::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber from the verbosity flags
    cli.output_config().init_tracing();

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
