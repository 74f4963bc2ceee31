// src/services/feed.rs

//! RSS 2.0 podcast feed parsing (channel plus iTunes extensions).

use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{FeedEpisode, FeedSummary};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    #[serde(rename = "itunes:author")]
    author: Option<String>,
    #[serde(rename = "itunes:owner")]
    owner: Option<Owner>,
    #[serde(rename = "itunes:email")]
    email: Option<String>,
    #[serde(rename = "itunes:image")]
    itunes_image: Option<ItunesImage>,
    image: Option<Image>,
    #[serde(rename = "itunes:category", default)]
    categories: Vec<Category>,
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    #[serde(rename = "itunes:name")]
    name: Option<String>,
    #[serde(rename = "itunes:email")]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItunesImage {
    #[serde(rename = "@href")]
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(rename = "@text")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "itunes:duration")]
    duration: Option<String>,
    enclosure: Option<Enclosure>,
}

#[derive(Debug, Deserialize)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
}

/// Parse a feed document into a channel summary.
pub fn parse_feed(xml: &str) -> Result<FeedSummary> {
    let rss: Rss = from_str(xml)?;
    let channel = rss.channel;

    let (owner_name, owner_email) = match channel.owner {
        Some(owner) => (clean(owner.name), clean(owner.email)),
        None => (None, None),
    };

    let image = channel
        .itunes_image
        .and_then(|i| clean(i.href))
        .or_else(|| channel.image.and_then(|i| clean(i.url)));

    Ok(FeedSummary {
        title: clean(channel.title),
        description: clean(channel.description),
        author: clean(channel.author),
        owner_name,
        owner_email: owner_email.or_else(|| clean(channel.email)),
        website: clean(channel.link),
        image,
        categories: channel
            .categories
            .into_iter()
            .filter_map(|c| clean(c.text))
            .collect(),
        episodes: channel
            .items
            .into_iter()
            .map(|item| FeedEpisode {
                title: clean(item.title),
                published: clean(item.pub_date),
                duration: clean(item.duration),
                audio_url: item.enclosure.and_then(|e| clean(e.url)),
            })
            .collect(),
    })
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
