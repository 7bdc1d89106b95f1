//! Shared JSON-over-HTTP client.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("cdrefresh/", env!("CARGO_PKG_VERSION"));

/// Thin JSON client shared by the provider adapters.
///
/// Every request carries the configured timeout so a hung endpoint can only
/// stall the task that issued it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Build a client for the local live-client endpoint, which serves a
    /// self-signed certificate.
    pub fn insecure_local(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .context("failed to build live client")?;
        Ok(Self { client })
    }

    /// GET `url` and deserialize the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode JSON from {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_an_error() -> Result<()> {
        let client = HttpClient::new(Duration::from_secs(2))?;
        let result = client
            .get_json::<serde_json::Value>("http://127.0.0.1:9/versions.json")
            .await;
        let err = result.expect_err("nothing listens on the discard port");
        assert!(format!("{err:#}").contains("127.0.0.1:9"));
        Ok(())
    }
}
