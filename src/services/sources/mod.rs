//! Search collaborators and lookups backed by public podcast APIs.
//!
//! - `AppleSearch`: iTunes Search API (topic search)
//! - `ListenNotesSearch`: Listen Notes episode search (guest search)
//! - `PodcastIndexSearch`: Podcast Index term search (guest + topic)
//! - `SpotifySearch`: Spotify show search (topic search)
//! - `AppleWebsiteResolver`: show website from an Apple Podcasts page
//! - `FeedOwnerDirectory`: `itunes:owner` email from a show's RSS feed

mod apple;
mod listen_notes;
mod podcast_index;
mod spotify;

pub use apple::{AppleSearch, AppleWebsiteResolver, FeedOwnerDirectory, ItunesShow};
pub use listen_notes::ListenNotesSearch;
pub use podcast_index::PodcastIndexSearch;
pub use spotify::SpotifySearch;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// Send an API request and decode a successful JSON body.
async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    source_name: &str,
) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::collaborator(
            source_name,
            format!("status {}", status.as_u16()),
        ));
    }
    Ok(response.json::<T>().await?)
}

/// Empty strings from APIs become `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
