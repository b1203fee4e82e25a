use std::{fmt, fs, path::Path, sync::Arc};

use futures::{stream, Stream, StreamExt};

use crate::{dns::Resolve, probe::Matcher, Error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Vec<String>),
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub hostname: String,
    pub resolution: Resolution,
    pub vulnerable_provider: Option<String>,
    pub dns_error: Option<String>,
    pub http_error: Option<String>,
}

impl ScanOutcome {
    fn new(hostname: String) -> Self {
        ScanOutcome {
            hostname,
            resolution: Resolution::Unresolved,
            vulnerable_provider: None,
            dns_error: None,
            http_error: None,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hostname = &self.hostname;

        writeln!(f)?;
        writeln!(f, "Checking subdomain: {}", hostname)?;
        if let Some(err) = &self.dns_error {
            writeln!(f, "Error resolving subdomain {}: {}", hostname, err)?;
        }

        let addresses = match &self.resolution {
            Resolution::Unresolved => {
                return writeln!(
                    f,
                    "The subdomain {} does not resolve to any IP address.",
                    hostname
                );
            }
            Resolution::Resolved(addresses) => addresses,
        };
        writeln!(
            f,
            "Resolved IP addresses for {}: {}",
            hostname,
            addresses.join(", ")
        )?;

        if let Some(err) = &self.http_error {
            writeln!(f, "Error making request to {}: {}", hostname, err)?;
        }

        match &self.vulnerable_provider {
            Some(provider) => {
                writeln!(f, "[!] Potential subdomain takeover vulnerability detected!")?;
                writeln!(f, "[!] Service: {}", provider)
            }
            None => writeln!(
                f,
                "No subdomain takeover vulnerability detected for {}.",
                hostname
            ),
        }
    }
}

/// Trims every line and drops the blank ones. Duplicates are kept.
pub fn parse_hostnames(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn read_hostnames(path: &Path) -> Result<Vec<String>, Error> {
    let input = fs::read_to_string(path).map_err(|source| Error::InputFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_hostnames(&input))
}

pub struct Scanner {
    resolver: Arc<dyn Resolve>,
    matcher: Matcher,
    concurrency: usize,
}

impl Scanner {
    pub fn new(
        resolver: Arc<dyn Resolve>,
        matcher: Matcher,
        concurrency: usize,
    ) -> Result<Self, Error> {
        if concurrency == 0 {
            return Err(Error::InvalidConcurrency);
        }

        Ok(Scanner {
            resolver,
            matcher,
            concurrency,
        })
    }

    /// Scans up to `concurrency` hostnames at a time. Outcomes come out in
    /// the order of `hostnames`, whatever order they complete in.
    pub fn scan(&self, hostnames: Vec<String>) -> impl Stream<Item = ScanOutcome> + '_ {
        stream::iter(hostnames)
            .map(move |hostname| self.scan_one(hostname))
            .buffered(self.concurrency)
    }

    pub async fn scan_one(&self, hostname: String) -> ScanOutcome {
        let mut outcome = ScanOutcome::new(hostname);

        match self.resolver.resolve(&outcome.hostname).await {
            Ok(addresses) => {
                tracing::debug!(hostname = %outcome.hostname, ?addresses, "resolved");
                outcome.resolution = Resolution::Resolved(addresses);
            }
            Err(Error::NameNotFound) => {
                tracing::debug!(hostname = %outcome.hostname, "name does not exist");
                return outcome;
            }
            Err(err) => {
                tracing::debug!(hostname = %outcome.hostname, error = %err, "DNS lookup failed");
                outcome.dns_error = Some(err.to_string());
                return outcome;
            }
        }

        match self.matcher.check(&outcome.hostname).await {
            Ok(provider) => outcome.vulnerable_provider = provider,
            Err(err) => {
                tracing::debug!(hostname = %outcome.hostname, error = %err, "HTTP request failed");
                outcome.http_error = Some(err.to_string());
            }
        }

        outcome
    }
}
