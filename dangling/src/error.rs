use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Usage: dangling <subdomains.txt>")]
    CliUsage,
    #[error("{}: {}", path.display(), source)]
    InputFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: Invalid fingerprints file: {}", path.display(), reason)]
    Fingerprints { path: PathBuf, reason: String },
    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,
    #[error("name does not exist")]
    NameNotFound,
    #[error("DNS lookup timed out")]
    DnsTimeout,
    #[error("{0}")]
    DnsLookup(String),
    #[error("{0}")]
    Http(String),
    #[error("Reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}
