// src/services/transcripts.rs

//! YouTube transcript retrieval through the public timed-text endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::de::from_str;
use quick_xml::escape::unescape;
use regex::Regex;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Transcript, TranscriptSegment};
use crate::utils::http::PageFetcher;

const TIMED_TEXT_URL: &str = "https://www.youtube.com/api/timedtext";

/// Preferred caption languages, in order.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["en", "en-US", "en-GB"];

/// Anything that can produce a transcript for a video ID.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// First available track among `languages`, or `None`.
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Option<Transcript>;
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(rename = "text", default)]
    lines: Vec<TimedLine>,
}

#[derive(Debug, Deserialize)]
struct TimedLine {
    #[serde(rename = "@start", default)]
    start: f64,
    #[serde(rename = "@dur", default)]
    dur: f64,
    #[serde(rename = "$text", default)]
    text: String,
}

/// Parse a timed-text XML document into segments.
pub fn parse_timed_text(xml: &str) -> Result<Vec<TranscriptSegment>> {
    let doc: TimedText = from_str(xml)?;
    Ok(doc
        .lines
        .into_iter()
        .map(|line| TranscriptSegment {
            text: unescape_caption(line.text.trim()),
            start: line.start,
            duration: line.dur,
        })
        .filter(|segment| !segment.text.is_empty())
        .collect())
}

/// Captions arrive double-escaped; undo the second layer. Text with a
/// malformed entity is kept as is.
fn unescape_caption(text: &str) -> String {
    let text = match unescape(text) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(e) => {
            log::debug!("Caption left escaped ({}): {}", e, text);
            text.to_string()
        }
    };
    text.replace('\n', " ")
}

/// Timed-text endpoint client. Manual tracks are tried before
/// auto-generated ones.
pub struct TimedTextSource {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
}

impl TimedTextSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    async fn track(&self, video_id: &str, language: &str, generated: bool) -> Option<Transcript> {
        let mut url = format!("{TIMED_TEXT_URL}?v={video_id}&lang={language}");
        if generated {
            url.push_str("&kind=asr");
        }

        let body = match self.fetcher.get(&url, self.timeout).await {
            Ok(page) => page.into_body().ok()?,
            Err(e) => {
                log::debug!("Timed text request failed for {}: {}", video_id, e);
                return None;
            }
        };
        if body.trim().is_empty() {
            return None;
        }

        let segments = match parse_timed_text(&body) {
            Ok(segments) => segments,
            Err(e) => {
                log::debug!("Unreadable timed text for {} ({}): {}", video_id, language, e);
                return None;
            }
        };
        if segments.is_empty() {
            return None;
        }

        Some(Transcript {
            video_id: video_id.to_string(),
            title: String::new(),
            segments,
            language: language.to_string(),
            is_generated: generated,
        })
    }
}

#[async_trait]
impl TranscriptSource for TimedTextSource {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Option<Transcript> {
        for generated in [false, true] {
            for language in languages {
                if let Some(transcript) = self.track(video_id, language, generated).await {
                    return Some(transcript);
                }
            }
        }
        None
    }
}

/// Resolves video references and fetches their transcripts.
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
    languages: Vec<String>,
    url_patterns: Vec<Regex>,
    bare_id: Regex,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Result<Self> {
        let url_patterns = [
            r"(?:youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]{11})",
            r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
            r"youtube\.com/v/([a-zA-Z0-9_-]{11})",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            source,
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            url_patterns,
            bare_id: Regex::new(r"^[a-zA-Z0-9_-]{11}$")?,
        })
    }

    /// Override the preferred languages.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    /// Video ID from a watch, short, embed or `/v/` URL, or a bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let input = input.trim();
        self.url_patterns
            .iter()
            .find_map(|p| p.captures(input).map(|c| c[1].to_string()))
            .or_else(|| self.bare_id.is_match(input).then(|| input.to_string()))
    }

    pub async fn fetch(&self, video: &str) -> Option<Transcript> {
        let Some(video_id) = self.extract_video_id(video) else {
            log::warn!("Could not extract video ID from: {}", video);
            return None;
        };
        let transcript = self.source.fetch(&video_id, &self.languages).await;
        if transcript.is_none() {
            log::warn!("No transcript available for {}", video_id);
        }
        transcript
    }

    /// Fetch each video in turn, skipping the ones without a transcript.
    pub async fn fetch_multiple(&self, videos: &[String]) -> Vec<Transcript> {
        let mut transcripts = Vec::new();
        for video in videos {
            if let Some(transcript) = self.fetch(video).await {
                transcripts.push(transcript);
            }
        }
        transcripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::StaticFetcher;

    const TRACK: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">Hello &amp;#39;world&amp;#39;</text><text start="2.6" dur="1.4">[Music]</text><text start="4" dur="1">  </text></transcript>"#;

    fn fetcher(pages: StaticFetcher) -> TranscriptFetcher {
        let source = TimedTextSource::new(Arc::new(pages), Duration::from_secs(5));
        TranscriptFetcher::new(Arc::new(source)).unwrap()
    }

    #[test]
    fn test_extract_video_id() {
        let f = fetcher(StaticFetcher::new());
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
        ] {
            assert_eq!(f.extract_video_id(input).as_deref(), Some("dQw4w9WgXcQ"), "{input}");
        }
        assert_eq!(f.extract_video_id("https://vimeo.com/123"), None);
        assert_eq!(f.extract_video_id("short"), None);
    }

    #[test]
    fn test_unescape_caption() {
        assert_eq!(unescape_caption("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_caption("&quot;hi&quot; &#x27;there&#39;"), "\"hi\" 'there'");
        assert_eq!(unescape_caption("line one\nline two"), "line one line two");
        assert_eq!(unescape_caption("AT&T rocks"), "AT&T rocks");
    }

    #[test]
    fn test_parse_timed_text() {
        let segments = parse_timed_text(TRACK).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello 'world'");
        assert_eq!(segments[0].start, 0.5);
        assert_eq!(segments[1].duration, 1.4);
    }

    #[tokio::test]
    async fn test_language_fallback_and_generated_tracks() {
        let f = fetcher(
            StaticFetcher::new()
                .page("https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en", "")
                .page(
                    "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en-GB",
                    TRACK,
                )
                .page(
                    "https://www.youtube.com/api/timedtext?v=aaaaaaaaaaa&lang=en&kind=asr",
                    TRACK,
                ),
        );

        let manual = f.fetch("https://youtu.be/dQw4w9WgXcQ").await.unwrap();
        assert_eq!(manual.language, "en-GB");
        assert!(!manual.is_generated);
        assert!((manual.duration_seconds() - 4.0).abs() < 1e-9);

        let generated = f.fetch("aaaaaaaaaaa").await.unwrap();
        assert!(generated.is_generated);
        assert_eq!(generated.language, "en");
    }

    #[tokio::test]
    async fn test_fetch_multiple_skips_failures() {
        let f = fetcher(StaticFetcher::new().page(
            "https://www.youtube.com/api/timedtext?v=bbbbbbbbbbb&lang=en",
            TRACK,
        ));
        let videos = vec![
            "not a video".to_string(),
            "ccccccccccc".to_string(),
            "bbbbbbbbbbb".to_string(),
        ];
        let transcripts = f.fetch_multiple(&videos).await;
        assert_eq!(transcripts.len(), 1);
        assert_eq!(transcripts[0].video_id, "bbbbbbbbbbb");
    }
}
