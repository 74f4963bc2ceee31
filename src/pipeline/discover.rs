// src/pipeline/discover.rs

//! Discovery runs: search, optional enrichment, persistence.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{Config, DiscoveredPodcast, DiscoverySource};
use crate::services::DiscoveryEngine;
use crate::services::sources::{
    AppleSearch, AppleWebsiteResolver, ListenNotesSearch, PodcastIndexSearch, SpotifySearch,
};
use crate::storage::{DiscoveryRun, ResultStorage};
use crate::utils::http::{HttpFetcher, PageFetcher};

/// Engine wired with every collaborator the configuration allows.
///
/// Guest order: Listen Notes, Podcast Index. Topic order: iTunes, Spotify,
/// Podcast Index. Collaborators without credentials are skipped.
pub fn build_engine(config: &Config, fetcher: &HttpFetcher) -> Result<DiscoveryEngine> {
    let pages: Arc<dyn PageFetcher> = Arc::new(fetcher.clone());
    let timeout = Duration::from_secs(config.fetcher.timeout_secs);
    let enrich_timeout = Duration::from_secs(config.fetcher.enrich_timeout_secs);

    let mut engine = DiscoveryEngine::new(config, pages.clone())?
        .with_resolver(Arc::new(AppleWebsiteResolver::new(pages.clone(), enrich_timeout)?));

    match config.credentials.listen_notes() {
        Some(key) => {
            engine = engine.with_guest_source(Arc::new(ListenNotesSearch::new(
                fetcher.client().clone(),
                key,
                timeout,
            )));
        }
        None => log::warn!("LISTEN_NOTES_API_KEY not set, Listen Notes search disabled"),
    }

    engine = engine.with_topic_source(Arc::new(AppleSearch::new(
        pages,
        config.discovery.apple_country.as_str(),
        timeout,
    )));

    match config.credentials.spotify() {
        Some((client_id, client_secret)) => {
            engine = engine.with_topic_source(Arc::new(SpotifySearch::new(
                fetcher.client().clone(),
                client_id,
                client_secret,
                timeout,
            )));
        }
        None => log::warn!("Spotify credentials not set, Spotify search disabled"),
    }

    match config.credentials.podcast_index() {
        Some((key, secret)) => {
            let index = Arc::new(PodcastIndexSearch::new(
                fetcher.client().clone(),
                key,
                secret,
                timeout,
            ));
            engine = engine.with_guest_source(index.clone()).with_topic_source(index);
        }
        None => log::warn!("Podcast Index credentials not set, Podcast Index search disabled"),
    }

    Ok(engine)
}

/// Search for `seed` and optionally enrich every result.
///
/// Enrichment runs with bounded concurrency and keeps search order.
pub async fn discover(
    engine: &DiscoveryEngine,
    seed: &DiscoverySource,
    max: usize,
    enrich: bool,
    concurrency: usize,
) -> Result<Vec<DiscoveredPodcast>> {
    let podcasts = match seed {
        DiscoverySource::Guest(name) => engine.search_by_seed_guest(name, max).await,
        DiscoverySource::Category(query) => engine.search_by_category(query, max).await,
        DiscoverySource::Unassigned => {
            return Err(AppError::config("a guest name or a category is required"));
        }
    };
    log::info!("Discovered {} podcasts for {}", podcasts.len(), seed);

    if !enrich || podcasts.is_empty() {
        return Ok(podcasts);
    }

    log::info!("Enriching {} podcasts...", podcasts.len());
    let enriched: Vec<DiscoveredPodcast> = stream::iter(podcasts)
        .map(|podcast| engine.enrich(podcast))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let with_contact = enriched.iter().filter(|p| p.primary_email().is_some()).count();
    log::info!("Found contacts for {}/{} podcasts", with_contact, enriched.len());
    Ok(enriched)
}

/// Full discovery run. The HTTP session lives for the duration of the call.
pub async fn run_discovery(
    config: &Config,
    storage: &dyn ResultStorage,
    seed: &DiscoverySource,
    max: usize,
    enrich: bool,
) -> Result<DiscoveryRun> {
    let fetcher = HttpFetcher::open(&config.fetcher)?;
    let engine = build_engine(config, &fetcher)?;

    let podcasts = discover(
        &engine,
        seed,
        max,
        enrich,
        config.discovery.enrich_concurrency,
    )
    .await?;

    let run = DiscoveryRun::new(seed.clone(), podcasts);
    storage.write_run(&run).await?;
    Ok(run)
}
