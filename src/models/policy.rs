//! Keyword and deny lists used by validation, classification and risk
//! detection. Kept as data so they can be tuned from `podscout.toml`.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Email validation and classification lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactPolicy {
    /// Substrings in email + context that mark a booking contact
    #[serde(default = "defaults::booking_keywords")]
    pub booking_keywords: Vec<String>,

    /// Personal webmail domains that mark a host contact
    #[serde(default = "defaults::host_domains")]
    pub host_domains: Vec<String>,

    /// Substrings that mark a producer contact
    #[serde(default = "defaults::producer_keywords")]
    pub producer_keywords: Vec<String>,

    /// Deny list for the contact finder path
    #[serde(default = "defaults::strict_deny")]
    pub strict_deny: Vec<String>,

    /// Narrower deny list for the discovery enrichment path
    #[serde(default = "defaults::enrichment_deny")]
    pub enrichment_deny: Vec<String>,
}

impl Default for ContactPolicy {
    fn default() -> Self {
        Self {
            booking_keywords: defaults::booking_keywords(),
            host_domains: defaults::host_domains(),
            producer_keywords: defaults::producer_keywords(),
            strict_deny: defaults::strict_deny(),
            enrichment_deny: defaults::enrichment_deny(),
        }
    }
}

impl ContactPolicy {
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("policy.booking_keywords", &self.booking_keywords),
            ("policy.host_domains", &self.host_domains),
            ("policy.producer_keywords", &self.producer_keywords),
            ("policy.strict_deny", &self.strict_deny),
            ("policy.enrichment_deny", &self.enrichment_deny),
        ];
        for (name, list) in lists {
            if list.iter().any(|term| term.trim().is_empty()) {
                return Err(AppError::validation(format!(
                    "{name} contains an empty term"
                )));
            }
        }
        Ok(())
    }
}

/// Term lists for each advisory risk flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPolicy {
    #[serde(default = "defaults::politics_terms")]
    pub politics: Vec<String>,

    #[serde(default = "defaults::explicit_terms")]
    pub explicit: Vec<String>,

    #[serde(default = "defaults::paid_guest_terms")]
    pub paid_guest: Vec<String>,

    #[serde(default = "defaults::no_guest_terms")]
    pub no_guests: Vec<String>,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            politics: defaults::politics_terms(),
            explicit: defaults::explicit_terms(),
            paid_guest: defaults::paid_guest_terms(),
            no_guests: defaults::no_guest_terms(),
        }
    }
}

mod defaults {
    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // Classification
    pub fn booking_keywords() -> Vec<String> {
        strings(&[
            "booking",
            "guest",
            "podcast",
            "media",
            "inquir",
            "press",
            "interview",
        ])
    }
    pub fn host_domains() -> Vec<String> {
        strings(&[
            "gmail.com",
            "yahoo.com",
            "outlook.com",
            "icloud.com",
            "me.com",
        ])
    }
    pub fn producer_keywords() -> Vec<String> {
        strings(&["producer", "production"])
    }

    // Validation
    pub fn strict_deny() -> Vec<String> {
        strings(&[
            "noreply",
            "no-reply",
            "donotreply",
            "mailer-daemon",
            "example.com",
            "example.org",
            "test.com",
            ".png",
            ".jpg",
            ".gif",
            ".svg",
            "wixpress",
            "sentry.io",
            "cloudflare",
            "privacy@",
            "abuse@",
            "postmaster@",
            "webmaster@",
        ])
    }
    pub fn enrichment_deny() -> Vec<String> {
        strings(&[
            "noreply",
            "no-reply",
            "donotreply",
            "info@",
            "support@",
            "help@",
            "privacy@",
            "legal@",
            "abuse@",
            ".png",
            ".jpg",
            ".gif",
        ])
    }

    // Risk signals
    pub fn politics_terms() -> Vec<String> {
        strings(&[
            "democrat",
            "republican",
            "trump",
            "biden",
            "maga",
            "liberal",
            "conservative",
            "political",
        ])
    }
    pub fn explicit_terms() -> Vec<String> {
        strings(&["explicit", "adult", "nsfw", "18+"])
    }
    pub fn paid_guest_terms() -> Vec<String> {
        strings(&[
            "sponsor a slot",
            "guest sponsorship",
            "paid guest",
            "buy a spot",
            "sponsor an episode",
        ])
    }
    pub fn no_guest_terms() -> Vec<String> {
        strings(&["solo show", "no interviews", "monologue", "solo podcast"])
    }
}
