// Entrypoint for the CLI.
// - Logging goes to stderr so stdout carries only JSON.
// - Any error is printed by `anyhow` and the process exits non-zero.

use clap::Parser;
use groupme::ui::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
