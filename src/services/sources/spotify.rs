// src/services/sources/spotify.rs

//! Spotify Web API show search with a client-credentials token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::error::Result;
use crate::models::DiscoveredPodcast;
use crate::services::discovery::TopicSearch;
use crate::services::sources::{fetch_json, non_empty};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";
const SOURCE_NAME: &str = "spotify";
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    shows: ShowPage,
}

#[derive(Debug, Default, Deserialize)]
struct ShowPage {
    /// Spotify may return `null` entries
    #[serde(default)]
    items: Vec<Option<Show>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Show {
    name: Option<String>,
    publisher: Option<String>,
    description: Option<String>,
    external_urls: ExternalUrls,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExternalUrls {
    spotify: Option<String>,
}

impl Show {
    fn into_podcast(self) -> DiscoveredPodcast {
        let spotify_url = non_empty(self.external_urls.spotify);
        let mut podcast = DiscoveredPodcast::new(
            self.name.unwrap_or_default(),
            spotify_url.clone().unwrap_or_default(),
        );
        podcast.host_name = non_empty(self.publisher);
        podcast.show_description = non_empty(self.description);
        podcast.spotify_url = spotify_url;
        podcast
    }
}

fn podcasts_from_response(response: SearchResponse, max: usize) -> Vec<DiscoveredPodcast> {
    response
        .shows
        .items
        .into_iter()
        .flatten()
        .take(max)
        .map(Show::into_podcast)
        .collect()
}

/// Spotify API client. Needs a client ID and secret.
pub struct SpotifySearch {
    client: Client,
    client_id: String,
    client_secret: String,
    timeout: Duration,
    token: Mutex<Option<String>>,
}

impl SpotifySearch {
    pub fn new(
        client: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout,
            token: Mutex::new(None),
        }
    }

    fn search_url(query: &str, limit: usize) -> Result<Url> {
        let limit = limit.clamp(1, MAX_LIMIT).to_string();
        Ok(Url::parse_with_params(
            SEARCH_URL,
            &[("q", query), ("type", "show"), ("limit", limit.as_str())],
        )?)
    }

    /// Cached access token, requested on first use.
    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(existing) = token.as_ref() {
            return Ok(existing.clone());
        }

        let request = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .timeout(self.timeout);
        let response: TokenResponse = fetch_json(request, SOURCE_NAME).await?;
        *token = Some(response.access_token.clone());
        Ok(response.access_token)
    }

    async fn search_shows(&self, query: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
        let token = self.access_token().await?;
        let request = self
            .client
            .get(Self::search_url(query, max)?)
            .bearer_auth(token)
            .timeout(self.timeout);
        let response: SearchResponse = fetch_json(request, SOURCE_NAME).await?;
        Ok(podcasts_from_response(response, max))
    }
}

#[async_trait]
impl TopicSearch for SpotifySearch {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search_topic(&self, query: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
        let result = self.search_shows(query, max).await;
        if result.is_err() {
            // Expired or revoked tokens are re-requested on the next search
            *self.token.lock().await = None;
        }
        result
    }
}
