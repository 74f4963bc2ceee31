//! In-memory fetcher for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::utils::http::{FetchedPage, PageFetcher};

/// Serves canned responses and records every requested URL.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, (u16, String)>,
    requested: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`.
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), (200, body.to_string()));
        self
    }

    /// Serve an arbitrary status for `url`.
    pub fn status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<FetchedPage> {
        if let Ok(mut urls) = self.requested.lock() {
            urls.push(url.to_string());
        }
        match self.pages.get(url) {
            Some((status, body)) => Ok(FetchedPage {
                url: url.to_string(),
                status: *status,
                body: body.clone(),
            }),
            None => Err(AppError::fetch(url, "connection refused")),
        }
    }
}
