// src/pipeline/transcripts.rs

//! Transcript retrieval for one or more videos.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::models::{Config, Transcript, TranscriptSegment};
use crate::services::{TimedTextSource, TranscriptFetcher};
use crate::utils::http::HttpFetcher;

pub const DEFAULT_MAX_LENGTH: usize = 5000;

/// Printable transcript: summarized text, segments only on request.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptOutput {
    pub video_id: String,
    pub language: String,
    pub is_generated: bool,
    pub duration_seconds: f64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<TranscriptSegment>>,
}

impl TranscriptOutput {
    pub fn from_transcript(transcript: Transcript, full: bool, max_length: usize) -> Self {
        let text = if full {
            transcript.full_text()
        } else {
            transcript.summarize(max_length)
        };
        Self {
            duration_seconds: transcript.duration_seconds(),
            text,
            video_id: transcript.video_id,
            language: transcript.language,
            is_generated: transcript.is_generated,
            segments: full.then_some(transcript.segments),
        }
    }
}

/// Fetch every video that has a transcript. Missing ones are skipped.
pub async fn run_transcripts(
    config: &Config,
    videos: &[String],
    full: bool,
    max_length: usize,
) -> Result<Vec<TranscriptOutput>> {
    let fetcher = HttpFetcher::open(&config.fetcher)?;
    let source = TimedTextSource::new(
        Arc::new(fetcher),
        Duration::from_secs(config.fetcher.timeout_secs),
    );
    let transcripts = TranscriptFetcher::new(Arc::new(source))?
        .fetch_multiple(videos)
        .await;
    log::info!("Fetched {}/{} transcripts", transcripts.len(), videos.len());

    Ok(transcripts
        .into_iter()
        .map(|t| TranscriptOutput::from_transcript(t, full, max_length))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Transcript {
        Transcript {
            video_id: "dQw4w9WgXcQ".into(),
            title: String::new(),
            segments: vec![
                TranscriptSegment {
                    text: "Welcome back.".into(),
                    start: 0.0,
                    duration: 2.0,
                },
                TranscriptSegment {
                    text: "[Music] Today we talk pricing".into(),
                    start: 2.0,
                    duration: 3.0,
                },
            ],
            language: "en".into(),
            is_generated: true,
        }
    }

    #[test]
    fn test_summary_output_omits_segments() {
        let out = TranscriptOutput::from_transcript(transcript(), false, DEFAULT_MAX_LENGTH);
        assert_eq!(out.text, "Welcome back. Today we talk pricing");
        assert!(out.segments.is_none());
        assert!((out.duration_seconds - 5.0).abs() < 1e-9);

        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("segments").is_none());
        assert_eq!(json["is_generated"], true);
    }

    #[test]
    fn test_full_output_keeps_segments() {
        let out = TranscriptOutput::from_transcript(transcript(), true, 10);
        assert_eq!(out.text, "Welcome back. [Music] Today we talk pricing");
        assert_eq!(out.segments.map(|s| s.len()), Some(2));
    }
}
