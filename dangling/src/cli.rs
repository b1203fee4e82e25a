use std::{
    io::{self, Write},
    path::Path,
    sync::Arc,
    time::Duration,
};

use futures::StreamExt;

use crate::{
    args::Args,
    dns::DnsResolver,
    fingerprints::Registry,
    probe::{HttpProbe, Matcher},
    scan::{self, Scanner},
    Error,
};

pub fn load_registry(path: Option<&Path>) -> Result<Registry, Error> {
    match path {
        Some(path) => Registry::from_file(path),
        None => Ok(Registry::builtin()),
    }
}

pub fn fingerprints(registry: &Registry) {
    for fingerprint in registry.iter() {
        println!("{}: {}", fingerprint.provider, fingerprint.marker);
    }
}

pub fn scan(file: &Path, args: &Args, registry: Registry) -> Result<(), Error> {
    let hostnames = scan::read_hostnames(file)?;
    let http_timeout = Duration::from_secs(args.timeout);
    let dns_timeout = Duration::from_secs(args.dns_timeout);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let resolver = DnsResolver::new(dns_timeout)?;
        let probe = HttpProbe::new(http_timeout)?;
        let matcher = Matcher::new(Arc::new(probe), Arc::new(registry));
        let scanner = Scanner::new(Arc::new(resolver), matcher, args.concurrency)?;

        tracing::info!(
            subdomains = hostnames.len(),
            concurrency = args.concurrency,
            "starting scan"
        );

        let mut vulnerable = 0;
        let mut outcomes = Box::pin(scanner.scan(hostnames));
        while let Some(outcome) = outcomes.next().await {
            if outcome.vulnerable_provider.is_some() {
                vulnerable += 1;
            }

            // one write per block so output never interleaves
            let block = outcome.to_string();
            let mut stdout = io::stdout().lock();
            stdout.write_all(block.as_bytes())?;
            stdout.flush()?;
        }

        tracing::info!(vulnerable, "scan finished");
        Ok::<(), Error>(())
    })
}
