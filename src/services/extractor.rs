// src/services/extractor.rs

//! Email token extraction from a single HTML page.
//!
//! Two independent channels: `mailto:` anchors (with their visible text as
//! classification context) and a pattern scan over the raw document.

use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::ExtractionMethod;

const MAILTO: &str = "mailto:";
const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,7}\b";

/// One email-like token found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEmail {
    pub token: String,
    pub method: ExtractionMethod,
    /// Anchor text for explicit links, empty for free text
    pub context: String,
}

/// Pulls raw email tokens out of HTML documents.
pub struct EmailExtractor {
    anchor_selector: Selector,
    email_pattern: Regex,
}

impl EmailExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            anchor_selector: parse_selector("a[href]")?,
            email_pattern: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// Extract tokens in document order: explicit links first, then free
    /// text. A free-text token is skipped when the same normalized address
    /// was already emitted for this page.
    pub fn extract(&self, html: &str) -> Vec<RawEmail> {
        let mut found = self.extract_mailto(html);
        let mut seen: HashSet<String> = found.iter().map(|e| e.token.to_lowercase()).collect();

        for m in self.email_pattern.find_iter(html) {
            let token = m.as_str();
            if seen.insert(token.to_lowercase()) {
                found.push(RawEmail {
                    token: token.to_string(),
                    method: ExtractionMethod::FreeText,
                    context: String::new(),
                });
            }
        }

        found
    }

    fn extract_mailto(&self, html: &str) -> Vec<RawEmail> {
        let document = Html::parse_document(html);
        document
            .select(&self.anchor_selector)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?.trim();
                let address = strip_mailto(href)?;
                let context = anchor
                    .text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(RawEmail {
                    token: address,
                    method: ExtractionMethod::ExplicitLink,
                    context,
                })
            })
            .collect()
    }
}

/// `mailto:Foo@Bar.com?subject=x` → `Foo@Bar.com`.
fn strip_mailto(href: &str) -> Option<String> {
    let scheme = href.get(..MAILTO.len())?;
    if !scheme.eq_ignore_ascii_case(MAILTO) {
        return None;
    }
    let rest = &href[MAILTO.len()..];
    let address = rest.split('?').next().unwrap_or_default().trim();
    if address.is_empty() {
        None
    } else {
        Some(address.to_string())
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
