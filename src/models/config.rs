//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ContactPolicy, RiskPolicy};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Contact page probing settings
    #[serde(default)]
    pub finder: FinderConfig,

    /// Email validation and classification keyword lists
    #[serde(default)]
    pub policy: ContactPolicy,

    /// Risk signal term lists
    #[serde(default)]
    pub risk: RiskPolicy,

    /// Search and enrichment settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// API credentials for optional search collaborators
    #[serde(default)]
    pub credentials: Credentials,

    /// Result persistence settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.credentials.overlay_env();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.credentials.overlay_env();
            config
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.enrich_timeout_secs == 0 {
            return Err(AppError::validation(
                "fetcher.enrich_timeout_secs must be > 0",
            ));
        }
        if self.fetcher.max_concurrent == 0 {
            return Err(AppError::validation("fetcher.max_concurrent must be > 0"));
        }
        if self.finder.contact_paths.is_empty() {
            return Err(AppError::validation("finder.contact_paths is empty"));
        }
        if self.finder.enrichment_paths.is_empty() {
            return Err(AppError::validation("finder.enrichment_paths is empty"));
        }
        if let Some(path) = self
            .finder
            .contact_paths
            .iter()
            .chain(&self.finder.enrichment_paths)
            .find(|p| !p.is_empty() && !p.starts_with('/'))
        {
            return Err(AppError::validation(format!(
                "finder path '{path}' must be empty or start with '/'"
            )));
        }
        if self.discovery.default_max_results == 0 {
            return Err(AppError::validation(
                "discovery.default_max_results must be > 0",
            ));
        }
        if self.discovery.enrich_concurrency == 0 {
            return Err(AppError::validation(
                "discovery.enrich_concurrency must be > 0",
            ));
        }
        self.policy.validate()?;
        Ok(())
    }
}

/// HTTP client settings shared by every fetch in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Total timeout per contact page fetch, in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Shorter timeout used on the enrichment path
    #[serde(default = "defaults::enrich_timeout")]
    pub enrich_timeout_secs: u64,

    /// Maximum concurrent page fetches per site
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            enrich_timeout_secs: defaults::enrich_timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Paths scanned relative to a show's website root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Ordered paths for the contact finder ("" is the homepage)
    #[serde(default = "defaults::contact_paths")]
    pub contact_paths: Vec<String>,

    /// Ordered paths for the discovery enrichment step
    #[serde(default = "defaults::enrichment_paths")]
    pub enrichment_paths: Vec<String>,

    /// Also scan each supplied social link as a single page
    #[serde(default)]
    pub scan_social_links: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            contact_paths: defaults::contact_paths(),
            enrichment_paths: defaults::enrichment_paths(),
            scan_social_links: false,
        }
    }
}

/// Search and enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Result cap when the caller gives none
    #[serde(default = "defaults::max_results")]
    pub default_max_results: usize,

    /// Podcasts enriched concurrently
    #[serde(default = "defaults::enrich_concurrency")]
    pub enrich_concurrency: usize,

    /// iTunes storefront country
    #[serde(default = "defaults::country")]
    pub apple_country: String,

    /// Look up feed owner emails as an extra contact source
    #[serde(default = "defaults::enabled")]
    pub use_feed_directory: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_max_results: defaults::max_results(),
            enrich_concurrency: defaults::enrich_concurrency(),
            apple_country: defaults::country(),
            use_feed_directory: defaults::enabled(),
        }
    }
}

/// Optional API credentials. Missing values disable the collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub listen_notes_api_key: Option<String>,
    #[serde(default)]
    pub podcast_index_key: Option<String>,
    #[serde(default)]
    pub podcast_index_secret: Option<String>,
    #[serde(default)]
    pub spotify_client_id: Option<String>,
    #[serde(default)]
    pub spotify_client_secret: Option<String>,
}

impl Credentials {
    /// Fill unset values from the environment.
    pub fn overlay_env(&mut self) {
        fn fill(slot: &mut Option<String>, var: &str) {
            if slot.as_deref().is_none_or(|v| v.trim().is_empty()) {
                *slot = env::var(var).ok().filter(|v| !v.trim().is_empty());
            }
        }
        fill(&mut self.listen_notes_api_key, "LISTEN_NOTES_API_KEY");
        fill(&mut self.podcast_index_key, "PODCAST_INDEX_API_KEY");
        fill(&mut self.podcast_index_secret, "PODCAST_INDEX_API_SECRET");
        fill(&mut self.spotify_client_id, "SPOTIFY_CLIENT_ID");
        fill(&mut self.spotify_client_secret, "SPOTIFY_CLIENT_SECRET");
    }

    /// Key and secret, when both are present.
    pub fn podcast_index(&self) -> Option<(&str, &str)> {
        match (&self.podcast_index_key, &self.podcast_index_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }

    /// Client ID and secret, when both are present.
    pub fn spotify(&self) -> Option<(&str, &str)> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }

    pub fn listen_notes(&self) -> Option<&str> {
        self.listen_notes_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}

/// Where discovery runs are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "defaults::output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn user_agent() -> String {
        "PodcastOutreach/1.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn enrich_timeout() -> u64 {
        10
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Finder defaults
    pub fn contact_paths() -> Vec<String> {
        [
            "/contact",
            "/contact-us",
            "/be-a-guest",
            "/guest",
            "/podcast",
            "/about",
            "/media",
            "/press",
            "/booking",
            "",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn enrichment_paths() -> Vec<String> {
        ["", "/contact", "/contact-us", "/about", "/guest", "/be-a-guest"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    // Discovery defaults
    pub fn max_results() -> usize {
        20
    }
    pub fn enrich_concurrency() -> usize {
        4
    }
    pub fn country() -> String {
        "us".into()
    }
    pub fn enabled() -> bool {
        true
    }

    // Output defaults
    pub fn output_dir() -> String {
        "output".into()
    }
}
