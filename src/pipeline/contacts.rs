// src/pipeline/contacts.rs

//! One-off contact lookup for a single show.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, RankedContactPair};
use crate::services::sources::{AppleSearch, FeedOwnerDirectory};
use crate::services::{ContactFinder, FinderProfile};
use crate::utils::http::{HttpFetcher, PageFetcher};

/// Contact-page finder, backed by the feed owner directory when enabled.
pub fn build_finder(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<ContactFinder> {
    let finder = ContactFinder::new(
        fetcher.clone(),
        &config.policy,
        FinderProfile::contact_page(config),
        config.fetcher.max_concurrent,
    )?;
    if !config.discovery.use_feed_directory {
        return Ok(finder);
    }

    let timeout = Duration::from_secs(config.fetcher.timeout_secs);
    let apple = Arc::new(AppleSearch::new(
        fetcher.clone(),
        config.discovery.apple_country.as_str(),
        timeout,
    ));
    let directory = FeedOwnerDirectory::new(apple, fetcher, &config.policy, timeout)?;
    Ok(finder.with_directory(Arc::new(directory)))
}

/// Ranked primary/backup pair for one show.
pub async fn run_contacts(
    config: &Config,
    podcast_name: &str,
    website_url: Option<&str>,
    social_links: &[String],
) -> Result<RankedContactPair> {
    let fetcher = HttpFetcher::open(&config.fetcher)?;
    let finder = build_finder(config, Arc::new(fetcher))?;

    let pair = finder
        .find_contacts(website_url, podcast_name, social_links)
        .await;
    if pair.is_empty() {
        log::info!("No contacts found for '{}'", podcast_name);
    }
    Ok(pair)
}
