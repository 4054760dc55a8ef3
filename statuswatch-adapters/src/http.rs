//! Shared HTTP plumbing for adapters.

use std::time::Duration;

use reqwest::Client;

use crate::AdapterError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A thin GET-only client shared by every adapter.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new builder for configuring the fetcher.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }

    /// Per-request timeout applied to every GET.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the raw body of a 2xx response.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, AdapterError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

/// Builder for HttpFetcher.
#[derive(Debug, Default)]
pub struct HttpFetcherBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpFetcherBuilder {
    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header (default: `statuswatch/<version>`).
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> Result<HttpFetcher, AdapterError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("statuswatch/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AdapterError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpFetcher { client, timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let fetcher = HttpFetcher::builder().build().unwrap();
        assert_eq!(fetcher.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builder_custom_timeout() {
        let fetcher = HttpFetcher::builder()
            .timeout(Duration::from_secs(3))
            .user_agent("test-agent")
            .build()
            .unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ok.json")
            .with_status(200)
            .with_body("{\"ok\":true}")
            .create_async()
            .await;

        let fetcher = HttpFetcher::builder().build().unwrap();
        let body = fetcher.get(&format!("{}/ok.json", server.url())).await.unwrap();

        assert_eq!(body, b"{\"ok\":true}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_non_success_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/down.json")
            .with_status(503)
            .create_async()
            .await;

        let fetcher = HttpFetcher::builder().build().unwrap();
        let err = fetcher
            .get(&format!("{}/down.json", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Http(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_get_connection_refused() {
        let fetcher = HttpFetcher::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        // Port 1 on loopback is never listening in test environments.
        let err = fetcher.get("http://127.0.0.1:1/status.json").await.unwrap_err();
        assert!(err.is_fetch());
    }
}
