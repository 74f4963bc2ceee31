// src/models/podcast.rs

//! Discovered podcast records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ContactCandidate, RankedContactPair};

/// Advisory content-policy flag for human review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskSignal {
    PotentialPolitics,
    PotentialExplicit,
    PotentialPaidGuest,
    PotentialNoGuests,
}

impl RiskSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskSignal::PotentialPolitics => "POTENTIAL_POLITICS",
            RiskSignal::PotentialExplicit => "POTENTIAL_EXPLICIT",
            RiskSignal::PotentialPaidGuest => "POTENTIAL_PAID_GUEST",
            RiskSignal::PotentialNoGuests => "POTENTIAL_NO_GUESTS",
        }
    }
}

impl fmt::Display for RiskSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which seed produced a record: `seed:<guest>` or `category:<query>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DiscoverySource {
    #[default]
    Unassigned,
    Guest(String),
    Category(String),
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoverySource::Unassigned => Ok(()),
            DiscoverySource::Guest(name) => write!(f, "seed:{name}"),
            DiscoverySource::Category(query) => write!(f, "category:{query}"),
        }
    }
}

impl From<DiscoverySource> for String {
    fn from(value: DiscoverySource) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DiscoverySource {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        if value.is_empty() {
            return Ok(DiscoverySource::Unassigned);
        }
        if let Some(name) = value.strip_prefix("seed:") {
            return Ok(DiscoverySource::Guest(name.to_string()));
        }
        if let Some(query) = value.strip_prefix("category:") {
            return Ok(DiscoverySource::Category(query.to_string()));
        }
        Err(AppError::validation(format!(
            "unknown discovery source '{value}'"
        )))
    }
}

/// One candidate show surfaced by discovery.
///
/// Serializes to a flat record. Contact fields can only be written as
/// email + source pairs through [`DiscoveredPodcast::apply_contacts`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredPodcast {
    pub show_name: String,
    pub host_name: Option<String>,
    pub primary_platform_url: String,
    pub website_url: Option<String>,
    pub apple_podcast_url: Option<String>,
    pub spotify_url: Option<String>,
    #[serde(default)]
    pub rss_feed_url: Option<String>,
    pub show_description: Option<String>,
    #[serde(default)]
    pub recent_episode_titles: Vec<String>,
    #[serde(default)]
    pub recent_guests: Vec<String>,
    primary_email: Option<String>,
    primary_email_source_url: Option<String>,
    backup_email: Option<String>,
    backup_email_source_url: Option<String>,
    #[serde(default)]
    pub discovery_source: DiscoverySource,
    #[serde(default)]
    pub risk_signals: Vec<RiskSignal>,
    pub dedupe_key: String,
}

impl DiscoveredPodcast {
    /// Create a record with the identity fields set. The dedupe key is
    /// filled in by the discovery engine.
    pub fn new(show_name: impl Into<String>, primary_platform_url: impl Into<String>) -> Self {
        Self {
            show_name: show_name.into(),
            primary_platform_url: primary_platform_url.into(),
            ..Self::default()
        }
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.primary_email.as_deref()
    }

    pub fn primary_email_source_url(&self) -> Option<&str> {
        self.primary_email_source_url.as_deref()
    }

    pub fn backup_email(&self) -> Option<&str> {
        self.backup_email.as_deref()
    }

    pub fn backup_email_source_url(&self) -> Option<&str> {
        self.backup_email_source_url.as_deref()
    }

    /// Store a ranked pair. Empty slots clear the corresponding fields.
    pub fn apply_contacts(&mut self, pair: &RankedContactPair) {
        (self.primary_email, self.primary_email_source_url) = Self::split(pair.primary.as_ref());
        (self.backup_email, self.backup_email_source_url) = Self::split(pair.backup.as_ref());
    }

    fn split(contact: Option<&ContactCandidate>) -> (Option<String>, Option<String>) {
        match contact {
            Some(c) => (
                Some(c.email().to_string()),
                Some(c.source_url().to_string()),
            ),
            None => (None, None),
        }
    }

    /// Check that every email has its source and vice versa.
    pub fn validate(&self) -> Result<()> {
        let pairs = [
            ("primary", &self.primary_email, &self.primary_email_source_url),
            ("backup", &self.backup_email, &self.backup_email_source_url),
        ];
        for (slot, email, source) in pairs {
            let has_email = email.as_deref().is_some_and(|e| !e.trim().is_empty());
            let has_source = source.as_deref().is_some_and(|s| !s.trim().is_empty());
            if has_email != has_source {
                return Err(AppError::validation(format!(
                    "{slot} email and source URL must both be present for '{}'",
                    self.show_name
                )));
            }
        }
        Ok(())
    }

    /// Title and description joined for text heuristics.
    pub fn searchable_text(&self) -> (&str, &str) {
        (
            self.show_name.as_str(),
            self.show_description.as_deref().unwrap_or(""),
        )
    }
}
