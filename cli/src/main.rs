mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{chain, splits};
use tracing_subscriber::EnvFilter;

/// Log to stderr. `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Chain(args) => chain::run(&cli, args),
        Commands::Splits(args) => splits::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
