// src/services/sources/apple.rs

//! iTunes Search API, Apple Podcasts pages and feed owner lookups.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ContactCandidate, ContactPolicy, DiscoveredPodcast, SourceUrl};
use crate::services::classifier::{ContactClassifier, DIRECTORY_CONFIDENCE};
use crate::services::discovery::{TopicSearch, WebsiteResolver};
use crate::services::feed::parse_feed;
use crate::services::finder::DirectorySearch;
use crate::services::sources::non_empty;
use crate::services::validator::{EmailValidator, ValidationMode};
use crate::utils::http::PageFetcher;
use crate::utils::normalize_name;

const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";
const ITUNES_MAX_LIMIT: usize = 200;
const DIRECTORY_LOOKUP_LIMIT: usize = 5;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItunesShow>,
}

/// One podcast entry of an iTunes search response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItunesShow {
    pub collection_name: Option<String>,
    pub artist_name: Option<String>,
    pub collection_view_url: Option<String>,
    pub feed_url: Option<String>,
    pub description: Option<String>,
}

impl ItunesShow {
    pub fn into_podcast(self) -> DiscoveredPodcast {
        let apple_url = non_empty(self.collection_view_url);
        let mut podcast = DiscoveredPodcast::new(
            self.collection_name.unwrap_or_default(),
            apple_url.clone().unwrap_or_default(),
        );
        podcast.host_name = non_empty(self.artist_name);
        podcast.apple_podcast_url = apple_url;
        podcast.rss_feed_url = non_empty(self.feed_url);
        podcast.show_description = non_empty(self.description);
        podcast
    }
}

/// iTunes Search API client.
pub struct AppleSearch {
    fetcher: Arc<dyn PageFetcher>,
    country: String,
    timeout: Duration,
}

impl AppleSearch {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        country: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            country: country.into(),
            timeout,
        }
    }

    pub fn search_url(&self, term: &str, limit: usize) -> Result<String> {
        let limit = limit.clamp(1, ITUNES_MAX_LIMIT).to_string();
        let url = Url::parse_with_params(
            ITUNES_SEARCH_URL,
            &[
                ("term", term),
                ("media", "podcast"),
                ("entity", "podcast"),
                ("limit", limit.as_str()),
                ("country", self.country.as_str()),
            ],
        )?;
        Ok(url.to_string())
    }

    /// Raw search results for `term`.
    pub async fn lookup(&self, term: &str, limit: usize) -> Result<Vec<ItunesShow>> {
        let url = self.search_url(term, limit)?;
        let body = self.fetcher.get(&url, self.timeout).await?.into_body()?;
        let response: SearchResponse = serde_json::from_str(&body)?;
        Ok(response.results)
    }
}

#[async_trait]
impl TopicSearch for AppleSearch {
    fn name(&self) -> &str {
        "itunes"
    }

    async fn search_topic(&self, query: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
        let shows = self.lookup(query, max).await?;
        Ok(shows
            .into_iter()
            .take(max)
            .map(ItunesShow::into_podcast)
            .collect())
    }
}

/// Reads a show's own website link off its Apple Podcasts page.
pub struct AppleWebsiteResolver {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
    link: Selector,
}

impl AppleWebsiteResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, timeout: Duration) -> Result<Self> {
        let link = Selector::parse("a.link[href]")
            .map_err(|e| AppError::selector("a.link[href]", format!("{e:?}")))?;
        Ok(Self {
            fetcher,
            timeout,
            link,
        })
    }

    /// First `a.link` pointing at an http(s) URL off Apple Podcasts.
    pub fn website_link(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.link)
            .filter_map(|el| el.value().attr("href"))
            .find(|href| is_external_link(href))
            .map(str::to_string)
    }
}

fn is_external_link(href: &str) -> bool {
    let rest = href
        .strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"));
    rest.is_some_and(|r| !r.starts_with("podcasts.apple"))
}

#[async_trait]
impl WebsiteResolver for AppleWebsiteResolver {
    async fn resolve(&self, podcast: &DiscoveredPodcast) -> Option<String> {
        let apple_url = podcast.apple_podcast_url.as_deref()?;
        match self.fetcher.get(apple_url, self.timeout).await.and_then(|p| p.into_body()) {
            Ok(html) => self.website_link(&html),
            Err(e) => {
                log::warn!("Website lookup failed for {}: {}", apple_url, e);
                None
            }
        }
    }
}

/// Contact lookup through the `itunes:owner` email of a show's feed.
pub struct FeedOwnerDirectory {
    apple: Arc<AppleSearch>,
    fetcher: Arc<dyn PageFetcher>,
    validator: EmailValidator,
    classifier: ContactClassifier,
    timeout: Duration,
}

impl FeedOwnerDirectory {
    pub fn new(
        apple: Arc<AppleSearch>,
        fetcher: Arc<dyn PageFetcher>,
        policy: &ContactPolicy,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            apple,
            fetcher,
            validator: EmailValidator::new(policy, ValidationMode::Strict)?,
            classifier: ContactClassifier::new(policy),
            timeout,
        })
    }

    async fn feed_owner(&self, podcast_name: &str) -> Result<Option<ContactCandidate>> {
        let target = normalize_name(podcast_name);
        let shows = self.apple.lookup(podcast_name, DIRECTORY_LOOKUP_LIMIT).await?;
        let Some(feed_url) = shows
            .into_iter()
            .find(|s| normalize_name(s.collection_name.as_deref().unwrap_or_default()) == target)
            .and_then(|s| non_empty(s.feed_url))
        else {
            return Ok(None);
        };

        let body = self.fetcher.get(&feed_url, self.timeout).await?.into_body()?;
        let feed = parse_feed(&body)?;
        let Some(email) = feed.owner_email.filter(|e| self.validator.is_valid(e)) else {
            return Ok(None);
        };

        let context = feed.owner_name.unwrap_or_default();
        let contact_type = self.classifier.classify(&email, &context);
        Ok(Some(ContactCandidate::new(
            &email,
            SourceUrl::new(feed_url)?,
            contact_type,
            DIRECTORY_CONFIDENCE,
        )))
    }
}

#[async_trait]
impl DirectorySearch for FeedOwnerDirectory {
    async fn search(&self, podcast_name: &str) -> Vec<ContactCandidate> {
        match self.feed_owner(podcast_name).await {
            Ok(found) => found.into_iter().collect(),
            Err(e) => {
                log::warn!("Feed owner lookup failed for '{}': {}", podcast_name, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactType;
    use crate::utils::testing::StaticFetcher;

    const SEARCH_JSON: &str = r#"{
        "resultCount": 2,
        "results": [
            {
                "collectionName": "The Show Extra",
                "artistName": "Other Network",
                "collectionViewUrl": "https://podcasts.apple.com/us/podcast/extra/id99",
                "feedUrl": "https://feeds.other.com/extra"
            },
            {
                "collectionName": "The Show",
                "artistName": "Jane Doe",
                "collectionViewUrl": "https://podcasts.apple.com/us/podcast/the-show/id42",
                "feedUrl": "https://feeds.show.com/rss"
            }
        ]
    }"#;

    const FEED: &str = r#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"><channel>
        <title>The Show</title>
        <itunes:owner><itunes:name>Show Media LLC</itunes:name><itunes:email>owner@show.com</itunes:email></itunes:owner>
    </channel></rss>"#;

    fn apple(fetcher: Arc<StaticFetcher>) -> AppleSearch {
        AppleSearch::new(fetcher, "us", Duration::from_secs(5))
    }

    #[test]
    fn test_search_url() {
        let search = apple(Arc::new(StaticFetcher::new()));
        let url = search.search_url("true crime", 500).unwrap();
        assert_eq!(
            url,
            "https://itunes.apple.com/search?term=true+crime&media=podcast&entity=podcast&limit=200&country=us"
        );
    }

    #[test]
    fn test_itunes_mapping() {
        let response: SearchResponse = serde_json::from_str(SEARCH_JSON).unwrap();
        let podcast = response.results[1].clone().into_podcast();

        assert_eq!(podcast.show_name, "The Show");
        assert_eq!(podcast.host_name.as_deref(), Some("Jane Doe"));
        assert_eq!(
            podcast.primary_platform_url,
            "https://podcasts.apple.com/us/podcast/the-show/id42"
        );
        assert_eq!(
            podcast.apple_podcast_url.as_deref(),
            Some(podcast.primary_platform_url.as_str())
        );
        assert_eq!(podcast.rss_feed_url.as_deref(), Some("https://feeds.show.com/rss"));
        assert_eq!(podcast.website_url, None);
    }

    #[tokio::test]
    async fn test_topic_search() {
        let urls = apple(Arc::new(StaticFetcher::new()));
        let fetcher = Arc::new(
            StaticFetcher::new().page(&urls.search_url("show", 1).unwrap(), SEARCH_JSON),
        );
        let results = apple(fetcher).search_topic("show", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].show_name, "The Show Extra");
    }

    #[test]
    fn test_website_link_skips_apple() {
        let resolver =
            AppleWebsiteResolver::new(Arc::new(StaticFetcher::new()), Duration::from_secs(5))
                .unwrap();
        let html = r#"
            <a class="link" href="https://podcasts.apple.com/us/genre/business">Business</a>
            <a class="link" href="/relative">Relative</a>
            <a href="https://elsewhere.com">No class</a>
            <a class="link external" href="https://show.com">Show Website</a>"#;
        assert_eq!(resolver.website_link(html).as_deref(), Some("https://show.com"));
        assert_eq!(resolver.website_link("<p>none</p>"), None);
    }

    #[tokio::test]
    async fn test_resolver_requires_apple_url() {
        let fetcher = Arc::new(StaticFetcher::new().page(
            "https://podcasts.apple.com/us/podcast/the-show/id42",
            r#"<a class="link" href="https://show.com">Website</a>"#,
        ));
        let resolver = AppleWebsiteResolver::new(fetcher, Duration::from_secs(5)).unwrap();

        let mut podcast = DiscoveredPodcast::new("The Show", "https://feeds.show.com/rss");
        assert_eq!(resolver.resolve(&podcast).await, None);

        podcast.apple_podcast_url =
            Some("https://podcasts.apple.com/us/podcast/the-show/id42".into());
        assert_eq!(resolver.resolve(&podcast).await.as_deref(), Some("https://show.com"));
    }

    #[tokio::test]
    async fn test_feed_owner_directory() {
        let urls = apple(Arc::new(StaticFetcher::new()));
        let fetcher = Arc::new(
            StaticFetcher::new()
                .page(
                    &urls.search_url("The Show!", DIRECTORY_LOOKUP_LIMIT).unwrap(),
                    SEARCH_JSON,
                )
                .page("https://feeds.show.com/rss", FEED),
        );
        let directory = FeedOwnerDirectory::new(
            Arc::new(apple(fetcher.clone())),
            fetcher,
            &ContactPolicy::default(),
            Duration::from_secs(5),
        )
        .unwrap();

        let found = directory.search("The Show!").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email(), "owner@show.com");
        assert_eq!(found[0].source_url().as_str(), "https://feeds.show.com/rss");
        // Owner name "Show Media LLC" carries a booking keyword
        assert_eq!(found[0].contact_type(), ContactType::Booking);
        assert_eq!(found[0].confidence(), DIRECTORY_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_feed_owner_directory_absorbs_failures() {
        let fetcher = Arc::new(StaticFetcher::new());
        let directory = FeedOwnerDirectory::new(
            Arc::new(apple(fetcher.clone())),
            fetcher,
            &ContactPolicy::default(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(directory.search("Unknown").await.is_empty());
    }
}
