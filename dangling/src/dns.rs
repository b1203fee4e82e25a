use std::time::Duration;

use async_trait::async_trait;
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    error::ResolveErrorKind,
    proto::op::ResponseCode,
    system_conf, TokioAsyncResolver,
};

use crate::Error;

#[async_trait]
pub trait Resolve: Send + Sync {
    /// Returns the A records of `hostname` in the order the server sent them.
    /// `Error::NameNotFound` means the server answered NXDOMAIN; every other
    /// error, an empty answer or a server failure included, is a diagnostic.
    async fn resolve(&self, hostname: &str) -> Result<Vec<String>, Error>;
}

pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsResolver {
    /// Builds a resolver from the system configuration, falling back to the
    /// library defaults when it cannot be read.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let (config, opts) = match system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(err) => {
                tracing::warn!(error = %err, "reading system DNS config, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };

        DnsResolver::with_config(config, opts, timeout)
    }

    pub fn with_config(
        config: ResolverConfig,
        mut opts: ResolverOpts,
        timeout: Duration,
    ) -> Result<Self, Error> {
        opts.timeout = timeout;
        opts.attempts = 1;

        let resolver = TokioAsyncResolver::tokio(config, opts)
            .map_err(|err| Error::DnsLookup(err.to_string()))?;

        Ok(DnsResolver { resolver, timeout })
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn resolve(&self, hostname: &str) -> Result<Vec<String>, Error> {
        // the resolver may retry over several name servers, bound the whole lookup
        let lookup = tokio::time::timeout(self.timeout * 2, self.resolver.ipv4_lookup(hostname))
            .await
            .map_err(|_| Error::DnsTimeout)?;

        match lookup {
            Ok(records) => {
                let addresses: Vec<String> = records.iter().map(|ip| ip.to_string()).collect();
                if addresses.is_empty() {
                    return Err(Error::DnsLookup(format!("no A records for {}", hostname)));
                }
                Ok(addresses)
            }
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound {
                    response_code: ResponseCode::NXDomain,
                    ..
                } => Err(Error::NameNotFound),
                ResolveErrorKind::Timeout => Err(Error::DnsTimeout),
                _ => Err(Error::DnsLookup(err.to_string())),
            },
        }
    }
}
