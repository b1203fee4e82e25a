use std::path::{Path, PathBuf};

use clap::{builder::RangedU64ValueParser, Parser};

use crate::Error;

/// Test subdomains for takeover vulnerabilities
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Path to the file containing subdomains (one per line)
    pub file: Option<PathBuf>,

    /// Number of subdomains scanned at the same time
    #[arg(short, long, default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: usize,

    /// HTTP request timeout, in seconds
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// DNS query timeout, in seconds
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub dns_timeout: u64,

    /// JSON file of {"provider", "marker"} objects replacing the builtin fingerprints
    #[arg(short, long)]
    pub fingerprints: Option<PathBuf>,

    /// Print the fingerprints in use and exit
    #[arg(long)]
    pub list_fingerprints: bool,
}

impl Args {
    /// The subdomains file, required unless only listing fingerprints.
    pub fn input_file(&self) -> Result<&Path, Error> {
        self.file.as_deref().ok_or(Error::CliUsage)
    }
}
