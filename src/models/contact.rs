// src/models/contact.rs

//! Contact candidates and the ranked primary/backup pair.
//!
//! Every candidate carries the URL of the page it was observed on. The
//! `SourceUrl` type refuses empty input, so a candidate without provenance
//! cannot be built, not even through deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// The exact page URL an email was observed on. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Wrap a fetched page URL. Fails on empty or whitespace-only input.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("source URL must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SourceUrl> for String {
    fn from(value: SourceUrl) -> Self {
        value.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Purpose category of a contact email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Booking,
    Host,
    Producer,
    General,
}

impl ContactType {
    /// Ranking priority, lower ranks first.
    pub fn priority(self) -> u8 {
        match self {
            ContactType::Booking => 0,
            ContactType::Host => 1,
            ContactType::Producer => 2,
            ContactType::General => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Booking => "booking",
            ContactType::Host => "host",
            ContactType::Producer => "producer",
            ContactType::General => "general",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a token was pulled out of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// `mailto:` anchor
    ExplicitLink,
    /// Pattern match over the raw document
    FreeText,
}

/// One email observation with mandatory provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactCandidate {
    email: String,
    source_url: SourceUrl,
    contact_type: ContactType,
    confidence: f64,
}

impl ContactCandidate {
    /// Build a candidate. The email is lower-cased and trimmed, the
    /// confidence clamped into `[0.0, 1.0]`.
    pub fn new(
        email: &str,
        source_url: SourceUrl,
        contact_type: ContactType,
        confidence: f64,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            email: email.trim().to_lowercase(),
            source_url,
            contact_type,
            confidence,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn source_url(&self) -> &SourceUrl {
        &self.source_url
    }

    pub fn contact_type(&self) -> ContactType {
        self.contact_type
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Best-effort primary/backup contacts for one show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedContactPair {
    pub primary: Option<ContactCandidate>,
    pub backup: Option<ContactCandidate>,
}

impl RankedContactPair {
    /// Take the first two entries of an already ranked list.
    pub fn from_ranked(ranked: Vec<ContactCandidate>) -> Self {
        let mut iter = ranked.into_iter();
        Self {
            primary: iter.next(),
            backup: iter.next(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.backup.is_none()
    }
}
