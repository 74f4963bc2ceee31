// src/pipeline/inspect.rs

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, SiteReport};
use crate::services::DiscoveryEngine;
use crate::utils::http::HttpFetcher;

/// Page metadata and feed summary for one URL.
pub async fn run_inspect(config: &Config, url: &str) -> Result<SiteReport> {
    let fetcher = HttpFetcher::open(&config.fetcher)?;
    let engine = DiscoveryEngine::new(config, Arc::new(fetcher))?;

    let report = engine.inspect_site(url).await?;
    log::info!(
        "'{}': {} social links, feed {}",
        report.page.title,
        report.page.social_links.len(),
        report.page.rss_feed.as_deref().unwrap_or("not found")
    );
    Ok(report)
}
