// src/services/discovery.rs

//! Discovery engine.
//!
//! Queries search collaborators in a fixed order, normalizes their records
//! (risk flags, dedupe keys, discovery tag) and enriches shows with a
//! website and ranked contacts.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, DiscoveredPodcast, DiscoverySource, FeedSummary, SiteReport};
use crate::services::dedupe::DedupeKeys;
use crate::services::feed::parse_feed;
use crate::services::finder::{ContactFinder, FinderProfile};
use crate::services::page::PageParser;
use crate::services::risk::RiskDetector;
use crate::utils::http::PageFetcher;

/// Finds shows a person appeared on.
#[async_trait]
pub trait GuestSearch: Send + Sync {
    fn name(&self) -> &str;

    async fn search_guest(&self, guest_name: &str, max: usize) -> Result<Vec<DiscoveredPodcast>>;
}

/// Finds shows matching a topic or category.
#[async_trait]
pub trait TopicSearch: Send + Sync {
    fn name(&self) -> &str;

    async fn search_topic(&self, query: &str, max: usize) -> Result<Vec<DiscoveredPodcast>>;
}

/// Looks up a show's own website from its platform page.
#[async_trait]
pub trait WebsiteResolver: Send + Sync {
    async fn resolve(&self, podcast: &DiscoveredPodcast) -> Option<String>;
}

/// Multi-source podcast discovery and enrichment.
pub struct DiscoveryEngine {
    fetcher: Arc<dyn PageFetcher>,
    guest_sources: Vec<Arc<dyn GuestSearch>>,
    topic_sources: Vec<Arc<dyn TopicSearch>>,
    resolver: Option<Arc<dyn WebsiteResolver>>,
    finder: ContactFinder,
    risk: RiskDetector,
    keys: DedupeKeys,
    pages: PageParser,
    timeout: Duration,
    enrich_timeout: Duration,
    scan_social_links: bool,
}

impl DiscoveryEngine {
    /// Engine with no collaborators. Enrichment uses the enrichment
    /// finder profile.
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let finder = ContactFinder::new(
            fetcher.clone(),
            &config.policy,
            FinderProfile::enrichment(config),
            config.fetcher.max_concurrent,
        )?;
        Ok(Self {
            fetcher,
            guest_sources: Vec::new(),
            topic_sources: Vec::new(),
            resolver: None,
            finder,
            risk: RiskDetector::new(&config.risk),
            keys: DedupeKeys::new()?,
            pages: PageParser::new()?,
            timeout: Duration::from_secs(config.fetcher.timeout_secs),
            enrich_timeout: Duration::from_secs(config.fetcher.enrich_timeout_secs),
            scan_social_links: config.finder.scan_social_links,
        })
    }

    /// Append a guest collaborator. Query order is insertion order.
    pub fn with_guest_source(mut self, source: Arc<dyn GuestSearch>) -> Self {
        self.guest_sources.push(source);
        self
    }

    /// Append a topic collaborator. Query order is insertion order.
    pub fn with_topic_source(mut self, source: Arc<dyn TopicSearch>) -> Self {
        self.topic_sources.push(source);
        self
    }

    /// Topic collaborator names in query order.
    pub fn topic_source_names(&self) -> Vec<&str> {
        self.topic_sources.iter().map(|source| source.name()).collect()
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn WebsiteResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Shows where `guest_name` appeared, at most `max`.
    pub async fn search_by_seed_guest(
        &self,
        guest_name: &str,
        max: usize,
    ) -> Vec<DiscoveredPodcast> {
        if self.guest_sources.is_empty() {
            log::warn!("No guest search collaborator configured");
            return Vec::new();
        }

        let mut results = Vec::new();
        for source in &self.guest_sources {
            if results.len() >= max {
                break;
            }
            let remaining = max - results.len();
            match source.search_guest(guest_name, remaining).await {
                Ok(found) => {
                    log::info!(
                        "{}: {} results for guest '{}'",
                        source.name(),
                        found.len(),
                        guest_name
                    );
                    results.extend(found);
                }
                Err(e) => log::warn!("{} guest search failed: {}", source.name(), e),
            }
        }

        self.finish(results, DiscoverySource::Guest(guest_name.to_string()), max)
    }

    /// Shows matching `query`, at most `max`.
    pub async fn search_by_category(&self, query: &str, max: usize) -> Vec<DiscoveredPodcast> {
        let mut results = Vec::new();
        for source in &self.topic_sources {
            if results.len() >= max {
                break;
            }
            let remaining = max - results.len();
            match source.search_topic(query, remaining).await {
                Ok(found) => {
                    log::info!("{}: {} results for '{}'", source.name(), found.len(), query);
                    results.extend(found);
                }
                Err(e) => log::warn!("{} topic search failed: {}", source.name(), e),
            }
        }

        self.finish(results, DiscoverySource::Category(query.to_string()), max)
    }

    /// Recompute risk and keys, drop later duplicates, tag and truncate.
    fn finish(
        &self,
        results: Vec<DiscoveredPodcast>,
        tag: DiscoverySource,
        max: usize,
    ) -> Vec<DiscoveredPodcast> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for mut podcast in results {
            podcast.dedupe_key = self.keys.key(&podcast.primary_platform_url, &podcast.show_name);
            if !seen.insert(podcast.dedupe_key.clone()) {
                log::debug!("Duplicate show '{}' ({})", podcast.show_name, podcast.dedupe_key);
                continue;
            }
            self.risk.apply(&mut podcast);
            podcast.discovery_source = tag.clone();
            unique.push(podcast);
        }
        unique.truncate(max);
        unique
    }

    /// Fill in the website and contact pair. Other fields are untouched.
    ///
    /// With social scanning enabled, profiles linked from the homepage are
    /// scanned as well.
    pub async fn enrich(&self, mut podcast: DiscoveredPodcast) -> DiscoveredPodcast {
        let has_website = podcast
            .website_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        if !has_website
            && !podcast.primary_platform_url.is_empty()
            && let Some(resolver) = &self.resolver
        {
            podcast.website_url = resolver.resolve(&podcast).await;
        }

        let Some(website) = podcast.website_url.clone().filter(|u| !u.trim().is_empty()) else {
            log::debug!("No website for '{}', skipping contact search", podcast.show_name);
            return podcast;
        };

        let social = if self.scan_social_links {
            self.homepage_social_links(&website).await
        } else {
            Vec::new()
        };
        let pair = self
            .finder
            .find_contacts(Some(&website), &podcast.show_name, &social)
            .await;
        if !pair.is_empty() {
            podcast.apply_contacts(&pair);
        }
        podcast
    }

    /// Social profile URLs linked from a show's homepage.
    async fn homepage_social_links(&self, website: &str) -> Vec<String> {
        match self
            .fetcher
            .get(website, self.enrich_timeout)
            .await
            .and_then(|p| p.into_body())
        {
            Ok(body) => self.pages.parse(&body, website).social_links.into_values().collect(),
            Err(e) => {
                log::debug!("No social links from {}: {}", website, e);
                Vec::new()
            }
        }
    }

    /// Metadata of one page plus the feed it advertises, if readable.
    pub async fn inspect_site(&self, url: &str) -> Result<SiteReport> {
        let body = self.fetcher.get(url, self.timeout).await?.into_body()?;
        let page = self.pages.parse(&body, url);

        let feed = match page.rss_feed.as_deref() {
            Some(feed_url) => self.read_feed(feed_url).await,
            None => None,
        };

        Ok(SiteReport {
            url: url.to_string(),
            page,
            feed,
        })
    }

    async fn read_feed(&self, feed_url: &str) -> Option<FeedSummary> {
        let body = match self
            .fetcher
            .get(feed_url, self.timeout)
            .await
            .and_then(|p| p.into_body())
        {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Feed fetch failed for {}: {}", feed_url, e);
                return None;
            }
        };
        match parse_feed(&body) {
            Ok(feed) => Some(feed),
            Err(e) => {
                log::warn!("Feed parse failed for {}: {}", feed_url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;
    use crate::models::RiskSignal;
    use crate::utils::testing::StaticFetcher;

    struct FakeSource {
        name: &'static str,
        records: Vec<DiscoveredPodcast>,
        fail: bool,
        asked: Mutex<Vec<(String, usize)>>,
    }

    impl FakeSource {
        fn new(name: &'static str, records: Vec<DiscoveredPodcast>) -> Self {
            Self {
                name,
                records,
                fail: false,
                asked: Mutex::new(Vec::new()),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::new(name, Vec::new())
            }
        }

        fn respond(&self, query: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
            self.asked.lock().unwrap().push((query.to_string(), max));
            if self.fail {
                return Err(AppError::collaborator(self.name, "status 500"));
            }
            Ok(self.records.iter().take(max).cloned().collect())
        }

        fn asked(&self) -> Vec<(String, usize)> {
            self.asked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GuestSearch for FakeSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn search_guest(
            &self,
            guest_name: &str,
            max: usize,
        ) -> Result<Vec<DiscoveredPodcast>> {
            self.respond(guest_name, max)
        }
    }

    #[async_trait]
    impl TopicSearch for FakeSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn search_topic(&self, query: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
            self.respond(query, max)
        }
    }

    struct FixedResolver(Option<String>);

    #[async_trait]
    impl WebsiteResolver for FixedResolver {
        async fn resolve(&self, _podcast: &DiscoveredPodcast) -> Option<String> {
            self.0.clone()
        }
    }

    fn show(name: &str, url: &str) -> DiscoveredPodcast {
        DiscoveredPodcast::new(name, url)
    }

    fn engine(fetcher: StaticFetcher) -> DiscoveryEngine {
        DiscoveryEngine::new(&Config::default(), Arc::new(fetcher)).unwrap()
    }

    #[tokio::test]
    async fn test_guest_search_dedupes_across_collaborators() {
        let mut political = show("Debate Club", "https://podcasts.apple.com/us/podcast/x/id42");
        political.show_description = Some("Political debate weekly".into());
        let first = Arc::new(FakeSource::new(
            "first",
            vec![political, show("Other", "https://other.fm/feed")],
        ));
        let second = Arc::new(FakeSource::new(
            "second",
            vec![
                show("Debate Club (mirror)", "https://podcasts.apple.com/gb/podcast/y/id42"),
                show("Third", "https://open.spotify.com/show/abc123"),
            ],
        ));

        let engine = engine(StaticFetcher::new())
            .with_guest_source(first.clone())
            .with_guest_source(second.clone());
        let results = engine.search_by_seed_guest("Jane Doe", 10).await;

        let names: Vec<_> = results.iter().map(|p| p.show_name.as_str()).collect();
        assert_eq!(names, vec!["Debate Club", "Other", "Third"]);
        assert_eq!(results[0].dedupe_key, "apple:42");
        assert_eq!(results[1].dedupe_key, "web:other.fm|other");
        assert_eq!(results[2].dedupe_key, "spotify:abc123");
        assert_eq!(results[0].risk_signals, vec![RiskSignal::PotentialPolitics]);
        assert!(results
            .iter()
            .all(|p| p.discovery_source == DiscoverySource::Guest("Jane Doe".into())));

        assert_eq!(first.asked(), vec![("Jane Doe".to_string(), 10)]);
        assert_eq!(second.asked(), vec![("Jane Doe".to_string(), 8)]);
    }

    #[tokio::test]
    async fn test_later_collaborators_skipped_when_full() {
        let first = Arc::new(FakeSource::new(
            "first",
            vec![show("A", "https://a.fm"), show("B", "https://b.fm")],
        ));
        let second = Arc::new(FakeSource::new("second", vec![show("C", "https://c.fm")]));

        let engine = engine(StaticFetcher::new())
            .with_topic_source(first)
            .with_topic_source(second.clone());
        let results = engine.search_by_category("fitness", 2).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].discovery_source.to_string(), "category:fitness");
        assert!(second.asked().is_empty());
    }

    #[tokio::test]
    async fn test_category_search_collapses_same_site_across_collaborators() {
        let first = Arc::new(FakeSource::new(
            "first",
            vec![show("The Show!", "https://show.com/feed.xml")],
        ));
        let second = Arc::new(FakeSource::new(
            "second",
            vec![show("the show", "https://show.com/podcast/rss")],
        ));

        let engine = engine(StaticFetcher::new())
            .with_topic_source(first)
            .with_topic_source(second.clone());
        let results = engine.search_by_category("startups", 10).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].show_name, "The Show!");
        assert_eq!(results[0].dedupe_key, "web:show.com|theshow");
        assert_eq!(second.asked(), vec![("startups".to_string(), 9)]);
    }

    #[tokio::test]
    async fn test_failing_collaborator_is_zero_results() {
        let engine = engine(StaticFetcher::new())
            .with_topic_source(Arc::new(FakeSource::failing("broken")))
            .with_topic_source(Arc::new(FakeSource::new("ok", vec![show("A", "https://a.fm")])));
        let results = engine.search_by_category("running", 5).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_no_guest_collaborators() {
        let engine = engine(StaticFetcher::new());
        assert!(engine.search_by_seed_guest("Jane Doe", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_enrich_resolves_website_and_contacts() {
        let fetcher = StaticFetcher::new().page(
            "https://show.com/contact",
            r#"<a href="mailto:guests@show.com">Be a guest</a><p>info@show.com hello@show.com</p>"#,
        );
        let engine = engine(fetcher)
            .with_resolver(Arc::new(FixedResolver(Some("https://show.com/".into()))));

        let mut podcast = show("The Show", "https://podcasts.apple.com/us/podcast/x/id7");
        podcast.dedupe_key = "apple:7".into();
        podcast.risk_signals = vec![RiskSignal::PotentialExplicit];
        let before = podcast.clone();

        let enriched = engine.enrich(podcast).await;
        assert_eq!(enriched.website_url.as_deref(), Some("https://show.com/"));
        assert_eq!(enriched.primary_email(), Some("guests@show.com"));
        assert_eq!(
            enriched.primary_email_source_url(),
            Some("https://show.com/contact")
        );
        assert_eq!(enriched.backup_email(), Some("hello@show.com"));
        assert!(enriched.validate().is_ok());

        assert_eq!(enriched.show_name, before.show_name);
        assert_eq!(enriched.dedupe_key, before.dedupe_key);
        assert_eq!(enriched.risk_signals, before.risk_signals);
    }

    #[tokio::test]
    async fn test_enrich_scans_homepage_social_links() {
        let fetcher = StaticFetcher::new()
            .page(
                "https://show.com",
                r#"<a href="https://twitter.com/theshow">Twitter</a>"#,
            )
            .page(
                "https://twitter.com/theshow",
                "<p>DM or email guests@theshow.fm</p>",
            );
        let mut config = Config::default();
        config.finder.scan_social_links = true;
        let engine = DiscoveryEngine::new(&config, Arc::new(fetcher)).unwrap();

        let mut podcast = show("The Show", "https://show.com/feed");
        podcast.website_url = Some("https://show.com".into());
        let enriched = engine.enrich(podcast).await;

        assert_eq!(enriched.primary_email(), Some("guests@theshow.fm"));
        assert_eq!(
            enriched.primary_email_source_url(),
            Some("https://twitter.com/theshow")
        );
    }

    #[tokio::test]
    async fn test_enrich_skips_social_links_by_default() {
        let fetcher = StaticFetcher::new()
            .page(
                "https://show.com",
                r#"<a href="https://twitter.com/theshow">Twitter</a>"#,
            )
            .page(
                "https://twitter.com/theshow",
                "<p>guests@theshow.fm</p>",
            );
        let engine = engine(fetcher);

        let mut podcast = show("The Show", "https://show.com/feed");
        podcast.website_url = Some("https://show.com".into());
        let enriched = engine.enrich(podcast).await;
        assert_eq!(enriched.primary_email(), None);
    }

    #[tokio::test]
    async fn test_enrich_without_website_is_noop() {
        let engine = engine(StaticFetcher::new()).with_resolver(Arc::new(FixedResolver(None)));
        let podcast = show("The Show", "https://podcasts.apple.com/us/podcast/x/id7");
        let enriched = engine.enrich(podcast.clone()).await;
        assert_eq!(enriched, podcast);
    }

    #[tokio::test]
    async fn test_inspect_site_reads_feed() {
        let fetcher = StaticFetcher::new()
            .page(
                "https://show.com",
                r#"<title>The Show</title><link type="application/rss+xml" href="/rss">"#,
            )
            .page(
                "https://show.com/rss",
                "<rss><channel><title>The Show</title><item><title>Ep 1</title></item></channel></rss>",
            );
        let report = engine(fetcher).inspect_site("https://show.com").await.unwrap();

        assert_eq!(report.page.title, "The Show");
        assert_eq!(report.page.rss_feed.as_deref(), Some("https://show.com/rss"));
        let feed = report.feed.unwrap();
        assert_eq!(feed.episodes.len(), 1);
    }

    #[tokio::test]
    async fn test_inspect_site_unreachable() {
        let engine = engine(StaticFetcher::new().status("https://gone.com", 404, ""));
        assert!(engine.inspect_site("https://gone.com").await.is_err());
    }
}
