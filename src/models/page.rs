//! Website metadata and RSS feed summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata extracted from a podcast website page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedPage {
    pub title: String,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub rss_feed: Option<String>,
    /// Platform name (e.g. "twitter") to profile URL
    pub social_links: BTreeMap<String, String>,
    pub categories: Vec<String>,
}

/// One episode from a podcast feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedEpisode {
    pub title: Option<String>,
    pub published: Option<String>,
    pub duration: Option<String>,
    pub audio_url: Option<String>,
}

/// Channel-level data from a podcast RSS feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedSummary {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub website: Option<String>,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub episodes: Vec<FeedEpisode>,
}

/// Result of inspecting a single site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteReport {
    pub url: String,
    pub page: ParsedPage,
    pub feed: Option<FeedSummary>,
}
