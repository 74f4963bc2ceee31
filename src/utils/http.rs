// src/utils/http.rs

//! HTTP client utilities.
//!
//! One `HttpFetcher` is opened per logical run (a discovery run or a finder
//! run). It owns the pooled `reqwest::Client`, and every fetch issued during
//! the run goes through it. Dropping the fetcher closes the pool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// Raw response for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    /// Only a plain 200 counts as usable content.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body of a usable page, or a fetch error describing the status.
    pub fn into_body(self) -> Result<String> {
        if self.is_ok() {
            Ok(self.body)
        } else {
            Err(AppError::fetch(self.url, format!("status {}", self.status)))
        }
    }
}

/// Capability to fetch a page body within a timeout.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetcherConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Session-scoped fetcher backed by a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Open a session with the configured user agent and default timeout.
    pub fn open(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }

    /// Client for collaborators that need headers or query parameters.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_200_is_ok() {
        let page = FetchedPage {
            url: "https://show.com".into(),
            status: 200,
            body: "<html></html>".into(),
        };
        assert!(page.clone().into_body().is_ok());

        let missing = FetchedPage {
            status: 404,
            ..page
        };
        assert!(!missing.is_ok());
        assert!(matches!(
            missing.into_body(),
            Err(AppError::Fetch { .. })
        ));
    }

    #[test]
    fn test_open_session() {
        assert!(HttpFetcher::open(&FetcherConfig::default()).is_ok());
    }
}
