//! Transcript data structures.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A timed piece of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Full transcript with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: String,
    pub is_generated: bool,
}

impl Transcript {
    /// All segment texts joined by single spaces.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// End of the last segment, in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.segments
            .last()
            .map_or(0.0, |last| last.start + last.duration)
    }

    /// Cleaned text capped at `max_length` characters.
    ///
    /// `[Music]`-style annotations are dropped and whitespace collapsed. An
    /// over-long text is cut at its last period when that period lies past
    /// 80% of the cap, otherwise hard-cut and suffixed with `...`.
    pub fn summarize(&self, max_length: usize) -> String {
        let text = strip_annotations(&self.full_text())
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if text.chars().count() <= max_length {
            return text;
        }

        let truncated: String = text.chars().take(max_length).collect();
        let threshold = max_length as f64 * 0.8;
        match truncated.rfind('.') {
            Some(pos) if truncated[..pos].chars().count() as f64 > threshold => {
                truncated[..=pos].to_string()
            }
            _ => format!("{truncated}..."),
        }
    }
}

/// `[Music]`, `[Applause]` and other caption annotations.
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("annotation pattern is valid"));

/// Remove every `[...]` span, shortest match first.
fn strip_annotations(text: &str) -> String {
    ANNOTATION.replace_all(text, "").into_owned()
}
