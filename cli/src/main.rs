//! taskspec - render command configurations into container task specifications

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskspec_cli::assets;
use taskspec_cli::cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // A build without its packaged resources cannot render anything.
    if let Err(e) = assets::preload() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = cli.run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
