use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{redirect, Client};

use crate::{fingerprints::Registry, Error};

const MAX_REDIRECTS: usize = 4;

#[async_trait]
pub trait Probe: Send + Sync {
    /// Fetches the body served for `hostname` over plain HTTP.
    async fn fetch(&self, hostname: &str) -> Result<String, Error>;
}

pub struct HttpProbe {
    http_client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let http_client = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;

        Ok(HttpProbe { http_client })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn fetch(&self, hostname: &str) -> Result<String, Error> {
        let url = format!("http://{}", hostname);

        let res = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::Http(err.to_string()))?;
        tracing::debug!(%url, status = %res.status(), "fetched");

        res.text().await.map_err(|err| Error::Http(err.to_string()))
    }
}

/// Looks for a registered fingerprint in what a host serves.
pub struct Matcher {
    probe: Arc<dyn Probe>,
    registry: Arc<Registry>,
}

impl Matcher {
    pub fn new(probe: Arc<dyn Probe>, registry: Arc<Registry>) -> Self {
        Matcher { probe, registry }
    }

    /// Returns the provider whose marker appears in the body, if any.
    pub async fn check(&self, hostname: &str) -> Result<Option<String>, Error> {
        let body = self.probe.fetch(hostname).await?;

        Ok(self
            .registry
            .find_match(&body)
            .map(|fingerprint| fingerprint.provider.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn create_test_matcher() -> Matcher {
        let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
        Matcher::new(Arc::new(probe), Arc::new(Registry::builtin()))
    }

    #[tokio::test]
    async fn detects_unclaimed_bucket() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(404)
            .with_body("<Error><Code>NoSuchBucket</Code><BucketName>a</BucketName></Error>")
            .create_async()
            .await;

        let provider = create_test_matcher()
            .check(&server.host_with_port())
            .await
            .unwrap();

        assert_eq!(provider.as_deref(), Some("AWS S3"));
    }

    #[tokio::test]
    async fn regular_page_is_not_a_match() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<html><body>Welcome to our blog</body></html>")
            .create_async()
            .await;

        let provider = create_test_matcher()
            .check(&server.host_with_port())
            .await
            .unwrap();

        assert!(provider.is_none());
    }

    #[tokio::test]
    async fn follows_redirects() {
        let mut server = Server::new_async().await;
        let _redirect = server
            .mock("GET", "/")
            .with_status(302)
            .with_header("location", "/gone")
            .create_async()
            .await;
        let _page = server
            .mock("GET", "/gone")
            .with_status(404)
            .with_body("There isn't a GitHub Pages site here.")
            .create_async()
            .await;

        let provider = create_test_matcher()
            .check(&server.host_with_port())
            .await
            .unwrap();

        assert_eq!(provider.as_deref(), Some("GitHub Pages"));
    }

    #[tokio::test]
    async fn connection_failure_is_an_error() {
        let result = create_test_matcher().check("127.0.0.1:9").await;

        assert!(matches!(result, Err(Error::Http(_))));
    }
}
