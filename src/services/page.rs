// src/services/page.rs

//! Podcast website metadata extraction.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::ParsedPage;
use crate::utils::{get_domain, resolve};

const UNKNOWN_TITLE: &str = "Unknown Podcast";
const TITLE_SUFFIXES: [&str; 3] = [" | Podcast", " - Podcast", " Podcast"];
const MAX_CATEGORY_LEN: usize = 50;

const SOCIAL_DOMAINS: [(&str, &str); 7] = [
    ("twitter.com", "twitter"),
    ("x.com", "twitter"),
    ("linkedin.com", "linkedin"),
    ("instagram.com", "instagram"),
    ("facebook.com", "facebook"),
    ("youtube.com", "youtube"),
    ("tiktok.com", "tiktok"),
];

const FEED_SUFFIXES: [&str; 4] = [".rss", ".xml", "/feed", "/feed/"];

/// Compiled selectors and patterns for page parsing.
pub struct PageParser {
    og_title: Selector,
    og_description: Selector,
    meta_description: Selector,
    title: Selector,
    h1: Selector,
    rss_link: Selector,
    anchor: Selector,
    category: Selector,
    host_patterns: Vec<Regex>,
}

impl PageParser {
    pub fn new() -> Result<Self> {
        let host_patterns = [
            r"[Hh]osted by ([A-Z][a-z]+ [A-Z][a-z]+)",
            r"[Ww]ith ([A-Z][a-z]+ [A-Z][a-z]+)",
            r"[Hh]ost:?\s*([A-Z][a-z]+ [A-Z][a-z]+)",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            og_title: parse_selector(r#"meta[property="og:title"]"#)?,
            og_description: parse_selector(r#"meta[property="og:description"]"#)?,
            meta_description: parse_selector(r#"meta[name="description"]"#)?,
            title: parse_selector("title")?,
            h1: parse_selector("h1")?,
            rss_link: parse_selector(r#"link[type="application/rss+xml"][href]"#)?,
            anchor: parse_selector("a[href]")?,
            category: parse_selector(".category, .tag, .genre, [class*='category']")?,
            host_patterns,
        })
    }

    /// Parse one page. `base_url` resolves relative feed links.
    pub fn parse(&self, html: &str, base_url: &str) -> ParsedPage {
        let document = Html::parse_document(html);
        ParsedPage {
            title: self.title(&document),
            description: self.description(&document),
            host_name: self.host_name(&document),
            rss_feed: self.rss_feed(&document, base_url),
            social_links: self.social_links(&document),
            categories: self.categories(&document),
        }
    }

    fn title(&self, document: &Html) -> String {
        if let Some(title) = meta_content(document, &self.og_title) {
            return title;
        }

        if let Some(el) = document.select(&self.title).next() {
            let mut title = element_text(&el).trim().to_string();
            for suffix in TITLE_SUFFIXES {
                if let Some(stripped) = title.strip_suffix(suffix) {
                    title = stripped.to_string();
                }
            }
            return title;
        }

        document
            .select(&self.h1)
            .next()
            .map(|el| element_text(&el).trim().to_string())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    fn description(&self, document: &Html) -> Option<String> {
        meta_content(document, &self.og_description)
            .or_else(|| meta_content(document, &self.meta_description))
    }

    fn host_name(&self, document: &Html) -> Option<String> {
        let text: String = document.root_element().text().collect();
        self.host_patterns
            .iter()
            .find_map(|pattern| pattern.captures(&text).map(|c| c[1].to_string()))
    }

    fn rss_feed(&self, document: &Html, base_url: &str) -> Option<String> {
        let join = |href: &str| resolve(base_url, href).unwrap_or_else(|| href.to_string());

        if let Some(href) = document
            .select(&self.rss_link)
            .find_map(|el| el.value().attr("href").filter(|h| !h.is_empty()))
        {
            return Some(join(href));
        }

        document.select(&self.anchor).find_map(|el| {
            let href = el.value().attr("href")?;
            let text = element_text(&el).to_lowercase();
            let mentions_feed = text.contains("rss") || text.contains("feed");
            let looks_like_feed = FEED_SUFFIXES.iter().any(|s| href.ends_with(s));
            (mentions_feed && looks_like_feed).then(|| join(href))
        })
    }

    fn social_links(&self, document: &Html) -> BTreeMap<String, String> {
        let mut links = BTreeMap::new();
        for el in document.select(&self.anchor) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            if let Some(platform) = social_platform(href) {
                links.insert(platform.to_string(), href.to_string());
            }
        }
        links
    }

    fn categories(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.category)
            .map(|el| element_text(&el).trim().to_string())
            .filter(|text| !text.is_empty() && text.chars().count() < MAX_CATEGORY_LEN)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Map an absolute link to its social platform name.
fn social_platform(href: &str) -> Option<&'static str> {
    let host = get_domain(href)?;
    let host = host.strip_prefix("www.").unwrap_or(&host);
    SOCIAL_DOMAINS.iter().find_map(|(domain, platform)| {
        let matches = host == *domain || host.ends_with(&format!(".{domain}"));
        matches.then_some(*platform)
    })
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .find_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PageParser {
        PageParser::new().unwrap()
    }

    const PAGE: &str = r#"<html><head>
        <title>Founders Talk | Podcast</title>
        <meta name="description" content="Conversations with builders.">
        <link rel="alternate" type="application/rss+xml" href="/feed.xml">
    </head><body>
        <h1>Founders Talk</h1>
        <p>Hosted by Jane Doe every week.</p>
        <a href="https://www.twitter.com/old">Old</a>
        <a href="https://x.com/founderstalk">X</a>
        <a href="https://www.instagram.com/founderstalk">IG</a>
        <a href="https://netflix.com/title">Not social</a>
        <span class="category">Business</span>
        <span class="tag">Startups</span>
        <span class="sub-category">Business</span>
    </body></html>"#;

    #[test]
    fn test_parse_page() {
        let page = parser().parse(PAGE, "https://founders.fm/about");

        assert_eq!(page.title, "Founders Talk");
        assert_eq!(page.description.as_deref(), Some("Conversations with builders."));
        assert_eq!(page.host_name.as_deref(), Some("Jane Doe"));
        assert_eq!(page.rss_feed.as_deref(), Some("https://founders.fm/feed.xml"));
        assert_eq!(page.social_links.len(), 2);
        assert_eq!(page.social_links["twitter"], "https://x.com/founderstalk");
        assert_eq!(
            page.social_links["instagram"],
            "https://www.instagram.com/founderstalk"
        );
        assert_eq!(page.categories, vec!["Business", "Startups"]);
    }

    #[test]
    fn test_og_tags_win() {
        let html = r#"<head>
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG description">
            <meta name="description" content="plain">
            <title>Plain</title></head>"#;
        let page = parser().parse(html, "");
        assert_eq!(page.title, "OG Title");
        assert_eq!(page.description.as_deref(), Some("OG description"));
    }

    #[test]
    fn test_title_fallbacks() {
        let p = parser();
        assert_eq!(p.parse("<h1> Just H1 </h1>", "").title, "Just H1");
        assert_eq!(p.parse("<p>nothing</p>", "").title, UNKNOWN_TITLE);
        assert_eq!(p.parse("<title>Deep Dive Podcast</title>", "").title, "Deep Dive");
    }

    #[test]
    fn test_feed_anchor_fallback() {
        let html = r#"<a href="/episodes">Episodes</a><a href="https://cdn.show.com/podcast.rss">RSS Feed</a>"#;
        let page = parser().parse(html, "https://show.com");
        assert_eq!(page.rss_feed.as_deref(), Some("https://cdn.show.com/podcast.rss"));
        assert_eq!(page.host_name, None);
    }
}
