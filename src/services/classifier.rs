// src/services/classifier.rs

//! Purpose classification and confidence scoring for contact emails.

use crate::models::{ContactPolicy, ContactType, ExtractionMethod};

/// Confidence of an explicit booking link.
pub const EXPLICIT_BOOKING_CONFIDENCE: f64 = 0.9;
/// Confidence of any other explicit link.
pub const EXPLICIT_CONFIDENCE: f64 = 0.7;
/// Confidence of a free-text match.
pub const FREE_TEXT_CONFIDENCE: f64 = 0.6;
/// Confidence of an address published as a feed owner.
pub const DIRECTORY_CONFIDENCE: f64 = 0.8;

/// Keyword and domain based classifier.
#[derive(Debug, Clone)]
pub struct ContactClassifier {
    booking_keywords: Vec<String>,
    host_domains: Vec<String>,
    producer_keywords: Vec<String>,
}

impl ContactClassifier {
    pub fn new(policy: &ContactPolicy) -> Self {
        let lower = |terms: &[String]| terms.iter().map(|t| t.to_lowercase()).collect();
        Self {
            booking_keywords: lower(&policy.booking_keywords),
            host_domains: lower(&policy.host_domains),
            producer_keywords: lower(&policy.producer_keywords),
        }
    }

    /// First match wins: booking, host, producer, general.
    pub fn classify(&self, email: &str, context: &str) -> ContactType {
        let email = email.trim().to_lowercase();
        let text = format!("{} {}", email, context.to_lowercase());

        if self.booking_keywords.iter().any(|k| text.contains(k.as_str())) {
            return ContactType::Booking;
        }

        let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
        if self.host_domains.iter().any(|d| d == domain) {
            return ContactType::Host;
        }

        if self.producer_keywords.iter().any(|k| text.contains(k.as_str())) {
            return ContactType::Producer;
        }

        ContactType::General
    }

    /// Confidence for a token found on a web page.
    pub fn confidence(method: ExtractionMethod, contact_type: ContactType) -> f64 {
        match (method, contact_type) {
            (ExtractionMethod::ExplicitLink, ContactType::Booking) => EXPLICIT_BOOKING_CONFIDENCE,
            (ExtractionMethod::ExplicitLink, _) => EXPLICIT_CONFIDENCE,
            (ExtractionMethod::FreeText, _) => FREE_TEXT_CONFIDENCE,
        }
    }
}
