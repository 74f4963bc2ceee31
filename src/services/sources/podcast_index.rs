// src/services/sources/podcast_index.rs

//! Podcast Index `search/byterm` client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use url::Url;

use crate::error::Result;
use crate::models::DiscoveredPodcast;
use crate::services::discovery::{GuestSearch, TopicSearch};
use crate::services::sources::{fetch_json, non_empty};

const SEARCH_URL: &str = "https://api.podcastindex.org/api/1.0/search/byterm";
const SOURCE_NAME: &str = "podcast_index";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    feeds: Vec<Feed>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Feed {
    title: Option<String>,
    author: Option<String>,
    url: Option<String>,
    link: Option<String>,
    description: Option<String>,
}

impl Feed {
    fn into_podcast(self) -> DiscoveredPodcast {
        let feed_url = non_empty(self.url);
        let mut podcast = DiscoveredPodcast::new(
            self.title.unwrap_or_default(),
            feed_url.clone().unwrap_or_default(),
        );
        podcast.host_name = non_empty(self.author);
        podcast.website_url = non_empty(self.link);
        podcast.rss_feed_url = feed_url;
        podcast.show_description = non_empty(self.description);
        podcast
    }
}

/// `X-Auth-Key`, `X-Auth-Date` and `Authorization` header values.
pub fn auth_headers(key: &str, secret: &str, epoch: i64) -> [(&'static str, String); 3] {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.update(epoch.to_string().as_bytes());
    [
        ("X-Auth-Key", key.to_string()),
        ("X-Auth-Date", epoch.to_string()),
        ("Authorization", hex::encode(hasher.finalize())),
    ]
}

/// Podcast Index API client. Needs a key and a secret.
pub struct PodcastIndexSearch {
    client: Client,
    key: String,
    secret: String,
    timeout: Duration,
}

impl PodcastIndexSearch {
    pub fn new(
        client: Client,
        key: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            key: key.into(),
            secret: secret.into(),
            timeout,
        }
    }

    async fn search_term(&self, term: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
        let limit = max.to_string();
        let url = Url::parse_with_params(SEARCH_URL, &[("q", term), ("max", limit.as_str())])?;

        let mut request = self.client.get(url).timeout(self.timeout);
        for (name, value) in auth_headers(&self.key, &self.secret, Utc::now().timestamp()) {
            request = request.header(name, value);
        }
        let response: SearchResponse = fetch_json(request, SOURCE_NAME).await?;

        Ok(response
            .feeds
            .into_iter()
            .take(max)
            .map(Feed::into_podcast)
            .collect())
    }
}

#[async_trait]
impl GuestSearch for PodcastIndexSearch {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    /// Term search for the exact, quoted name.
    async fn search_guest(&self, guest_name: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
        self.search_term(&format!("\"{guest_name}\""), max).await
    }
}

#[async_trait]
impl TopicSearch for PodcastIndexSearch {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search_topic(&self, query: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
        self.search_term(query, max).await
    }
}
