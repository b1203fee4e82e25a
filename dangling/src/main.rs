use anyhow::Result;
use args::Args;

mod args;
mod cli;
mod dns;
mod error;
mod fingerprints;
mod probe;
mod scan;
use clap::Parser;
pub use error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stdout carries the report, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let registry = cli::load_registry(args.fingerprints.as_deref())?;

    if args.list_fingerprints {
        cli::fingerprints(&registry);
    } else {
        cli::scan(args.input_file()?, &args, registry)?;
    }

    Ok(())
}
