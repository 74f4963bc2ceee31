// src/services/sources/listen_notes.rs

//! Listen Notes episode search, used to find shows a guest appeared on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::Result;
use crate::models::DiscoveredPodcast;
use crate::services::discovery::GuestSearch;
use crate::services::sources::{fetch_json, non_empty};

const SEARCH_URL: &str = "https://listen-api.listennotes.com/api/v2/search";
const SOURCE_NAME: &str = "listen_notes";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Episode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Episode {
    title_original: Option<String>,
    podcast: Option<Podcast>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Podcast {
    id: Option<String>,
    title_original: Option<String>,
    publisher_original: Option<String>,
    listennotes_url: Option<String>,
    website: Option<String>,
    description_original: Option<String>,
}

/// Listen Notes API client. Needs an API key.
pub struct ListenNotesSearch {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl ListenNotesSearch {
    pub fn new(client: Client, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            timeout,
        }
    }

    fn search_url(guest_name: &str) -> Result<Url> {
        let query = format!("\"{guest_name}\"");
        Ok(Url::parse_with_params(
            SEARCH_URL,
            &[
                ("q", query.as_str()),
                ("type", "episode"),
                ("len_min", "10"),
                ("language", "English"),
                ("safe_mode", "1"),
            ],
        )?)
    }
}

/// One record per podcast, in order of first appearance. Later episodes of
/// the same show add their titles.
fn podcasts_from_episodes(response: SearchResponse, guest_name: &str) -> Vec<DiscoveredPodcast> {
    let mut ids: Vec<String> = Vec::new();
    let mut podcasts: Vec<DiscoveredPodcast> = Vec::new();

    for episode in response.results {
        let Some(show) = episode.podcast else {
            continue;
        };
        let Some(id) = non_empty(show.id) else {
            continue;
        };
        let episode_title = non_empty(episode.title_original);

        if let Some(pos) = ids.iter().position(|known| *known == id) {
            if let Some(title) = episode_title
                && !podcasts[pos].recent_episode_titles.contains(&title)
            {
                podcasts[pos].recent_episode_titles.push(title);
            }
            continue;
        }

        let mut podcast = DiscoveredPodcast::new(
            show.title_original.unwrap_or_default(),
            show.listennotes_url.unwrap_or_default(),
        );
        podcast.host_name = non_empty(show.publisher_original);
        podcast.website_url = non_empty(show.website);
        podcast.show_description = non_empty(show.description_original);
        podcast.recent_episode_titles = episode_title.into_iter().collect();
        podcast.recent_guests = vec![guest_name.to_string()];

        ids.push(id);
        podcasts.push(podcast);
    }

    podcasts
}

#[async_trait]
impl GuestSearch for ListenNotesSearch {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search_guest(&self, guest_name: &str, max: usize) -> Result<Vec<DiscoveredPodcast>> {
        let request = self
            .client
            .get(Self::search_url(guest_name)?)
            .header("X-ListenAPI-Key", &self.api_key)
            .timeout(self.timeout);
        let response: SearchResponse = fetch_json(request, SOURCE_NAME).await?;

        let mut podcasts = podcasts_from_episodes(response, guest_name);
        podcasts.truncate(max);
        Ok(podcasts)
    }
}
