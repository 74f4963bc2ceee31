// src/services/finder.rs

//! Contact finder.
//!
//! Scans a fixed list of paths under a show's website, turns every usable
//! page into source-stamped contact candidates, merges them with an optional
//! directory lookup and ranks the result into a primary/backup pair.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, ContactCandidate, ContactPolicy, RankedContactPair, SourceUrl};
use crate::services::classifier::ContactClassifier;
use crate::services::extractor::EmailExtractor;
use crate::services::ranker::top_pair;
use crate::services::validator::{EmailValidator, ValidationMode};
use crate::utils::http::PageFetcher;
use crate::utils::page_url;

/// Out-of-band contact lookup keyed by show name.
#[async_trait]
pub trait DirectorySearch: Send + Sync {
    /// Candidates already stamped with the URL they were read from.
    /// Failures are absorbed and yield an empty list.
    async fn search(&self, podcast_name: &str) -> Vec<ContactCandidate>;
}

/// Paths, validation mode and timeout for one kind of finder run.
#[derive(Debug, Clone)]
pub struct FinderProfile {
    pub paths: Vec<String>,
    pub mode: ValidationMode,
    pub timeout: Duration,
    pub scan_social_links: bool,
}

impl FinderProfile {
    /// Contact page probing with strict validation.
    pub fn contact_page(config: &Config) -> Self {
        Self {
            paths: config.finder.contact_paths.clone(),
            mode: ValidationMode::Strict,
            timeout: Duration::from_secs(config.fetcher.timeout_secs),
            scan_social_links: config.finder.scan_social_links,
        }
    }

    /// Shorter path list, permissive validation and the enrichment timeout.
    pub fn enrichment(config: &Config) -> Self {
        Self {
            paths: config.finder.enrichment_paths.clone(),
            mode: ValidationMode::Enrichment,
            timeout: Duration::from_secs(config.fetcher.enrich_timeout_secs),
            scan_social_links: config.finder.scan_social_links,
        }
    }
}

/// Outcome of scanning one page.
#[derive(Debug, Clone)]
pub enum PageScan {
    Scanned {
        url: String,
        candidates: Vec<ContactCandidate>,
    },
    Failed {
        url: String,
        reason: String,
    },
}

impl PageScan {
    pub fn url(&self) -> &str {
        match self {
            PageScan::Scanned { url, .. } | PageScan::Failed { url, .. } => url,
        }
    }

    /// Candidates of a scanned page; a failed page contributes nothing.
    pub fn into_candidates(self) -> Vec<ContactCandidate> {
        match self {
            PageScan::Scanned { candidates, .. } => candidates,
            PageScan::Failed { .. } => Vec::new(),
        }
    }
}

/// Finds and ranks contact emails for one show.
pub struct ContactFinder {
    fetcher: Arc<dyn PageFetcher>,
    directory: Option<Arc<dyn DirectorySearch>>,
    extractor: EmailExtractor,
    validator: EmailValidator,
    classifier: ContactClassifier,
    profile: FinderProfile,
    concurrency: usize,
}

impl ContactFinder {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        policy: &ContactPolicy,
        profile: FinderProfile,
        concurrency: usize,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            directory: None,
            extractor: EmailExtractor::new()?,
            validator: EmailValidator::new(policy, profile.mode)?,
            classifier: ContactClassifier::new(policy),
            profile,
            concurrency: concurrency.max(1),
        })
    }

    /// Also consult a directory for every show.
    pub fn with_directory(mut self, directory: Arc<dyn DirectorySearch>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Best-effort primary and backup contacts. Never fails: unreachable
    /// pages and empty sites simply produce an empty pair.
    pub async fn find_contacts(
        &self,
        website_url: Option<&str>,
        podcast_name: &str,
        social_links: &[String],
    ) -> RankedContactPair {
        let candidates = self
            .collect_candidates(website_url, podcast_name, social_links)
            .await;
        let pair = top_pair(candidates);
        log::debug!(
            "Contacts for '{}': primary={:?} backup={:?}",
            podcast_name,
            pair.primary.as_ref().map(|c| c.email()),
            pair.backup.as_ref().map(|c| c.email())
        );
        pair
    }

    /// Every candidate in discovery order, before ranking.
    pub async fn collect_candidates(
        &self,
        website_url: Option<&str>,
        podcast_name: &str,
        social_links: &[String],
    ) -> Vec<ContactCandidate> {
        let mut urls: Vec<String> = match website_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(base) => self
                .profile
                .paths
                .iter()
                .map(|path| page_url(base, path))
                .collect(),
            None => Vec::new(),
        };
        if self.profile.scan_social_links {
            urls.extend(
                social_links
                    .iter()
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty()),
            );
        }

        let scans: Vec<PageScan> = stream::iter(urls)
            .map(|url| self.scan_page(url))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut candidates = Vec::new();
        for scan in scans {
            match &scan {
                PageScan::Scanned { candidates, .. } => {
                    log::debug!("Scanned {} ({} candidates)", scan.url(), candidates.len());
                }
                PageScan::Failed { reason, .. } => {
                    log::warn!("Skipping {}: {}", scan.url(), reason);
                }
            }
            candidates.extend(scan.into_candidates());
        }

        if let Some(directory) = &self.directory
            && !podcast_name.trim().is_empty()
        {
            candidates.extend(directory.search(podcast_name).await);
        }

        candidates
    }

    /// Fetch one page and turn its body into candidates.
    pub async fn scan_page(&self, url: String) -> PageScan {
        let page = match self.fetcher.get(&url, self.profile.timeout).await {
            Ok(page) => page,
            Err(e) => {
                return PageScan::Failed {
                    url,
                    reason: e.to_string(),
                };
            }
        };
        if !page.is_ok() {
            return PageScan::Failed {
                url,
                reason: format!("status {}", page.status),
            };
        }
        match SourceUrl::new(url.as_str()) {
            Ok(source) => PageScan::Scanned {
                candidates: self.candidates_from_html(&source, &page.body),
                url,
            },
            Err(e) => PageScan::Failed {
                url,
                reason: e.to_string(),
            },
        }
    }

    fn candidates_from_html(&self, source: &SourceUrl, html: &str) -> Vec<ContactCandidate> {
        self.extractor
            .extract(html)
            .into_iter()
            .filter(|raw| self.validator.is_valid(&raw.token))
            .map(|raw| {
                let contact_type = self.classifier.classify(&raw.token, &raw.context);
                let confidence = ContactClassifier::confidence(raw.method, contact_type);
                ContactCandidate::new(&raw.token, source.clone(), contact_type, confidence)
            })
            .collect()
    }
}
