mod cli;

use std::error::Error;

use clap::Parser;
use offshorex::dispatch::Outcome;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{execute, Cli};

/// Log to standard error, filtered by `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("offshorex=info,warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    // Warnings and missing selections are reported but still exit cleanly.
    match execute(&cli)? {
        Outcome::Completed { text, .. } => {
            if let Some(text) = text {
                print!("{text}");
            }
        }
        Outcome::Skipped(warning) => println!("{warning}"),
        Outcome::NoSelection { hint } => println!("{hint}"),
    }
    Ok(())
}
