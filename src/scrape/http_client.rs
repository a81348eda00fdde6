//! HTTP page fetching behind a trait seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::ScrapeError;

/// Fetches one listing page by URL.
///
/// The trait is the collaborator boundary between the paging loop and the
/// network; tests substitute canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;
}

/// reqwest-backed fetcher with user agent and timeout applied.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
