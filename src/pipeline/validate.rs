// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::storage::ResultStorage;

/// Validate the configuration and, if present, the latest stored run.
pub async fn run_validate(config: &Config, storage: &dyn ResultStorage) -> Result<()> {
    log::info!("Validating configuration...");
    if let Err(e) = config.validate() {
        log::error!("Configuration invalid: {}", e);
        return Err(e);
    }
    log::info!("  user_agent: {}", config.fetcher.user_agent);
    log::info!(
        "  timeout: {}s (enrichment {}s)",
        config.fetcher.timeout_secs,
        config.fetcher.enrich_timeout_secs
    );
    log::info!("  contact paths: {}", config.finder.contact_paths.len());
    log::info!("  enrichment paths: {}", config.finder.enrichment_paths.len());
    log::info!(
        "  listen notes: {}, podcast index: {}",
        if config.credentials.listen_notes().is_some() { "configured" } else { "missing" },
        if config.credentials.podcast_index().is_some() { "configured" } else { "missing" }
    );

    match storage.load_latest().await? {
        Some(run) => log::info!(
            "Latest run valid: {} podcasts from {} ({})",
            run.count,
            run.discovery_source,
            run.updated_at.to_rfc3339()
        ),
        None => log::info!("No stored runs yet"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{DiscoveredPodcast, DiscoverySource};
    use crate::storage::{DiscoveryRun, LocalStorage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_empty_store() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(run_validate(&Config::default(), &storage).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_with_stored_run() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let mut podcast = DiscoveredPodcast::new("The Show", "https://show.com/feed");
        podcast.dedupe_key = "web:show.com|the show".into();
        let run = DiscoveryRun::new(DiscoverySource::Category("tech".into()), vec![podcast]);
        storage.write_run(&run).await.unwrap();

        assert!(run_validate(&Config::default(), &storage).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_config() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let mut config = Config::default();
        config.fetcher.timeout_secs = 0;

        assert!(matches!(
            run_validate(&config, &storage).await,
            Err(AppError::Validation(_))
        ));
    }
}
