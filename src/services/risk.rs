// src/services/risk.rs

//! Advisory risk flags from show title and description.

use crate::models::{DiscoveredPodcast, RiskPolicy, RiskSignal};

/// Substring matcher over a show's searchable text.
#[derive(Debug, Clone)]
pub struct RiskDetector {
    rules: Vec<(RiskSignal, Vec<String>)>,
}

impl RiskDetector {
    pub fn new(policy: &RiskPolicy) -> Self {
        let lower = |terms: &[String]| terms.iter().map(|t| t.to_lowercase()).collect();
        Self {
            rules: vec![
                (RiskSignal::PotentialPolitics, lower(&policy.politics)),
                (RiskSignal::PotentialExplicit, lower(&policy.explicit)),
                (RiskSignal::PotentialPaidGuest, lower(&policy.paid_guest)),
                (RiskSignal::PotentialNoGuests, lower(&policy.no_guests)),
            ],
        }
    }

    /// Each flag is evaluated independently, in declaration order.
    pub fn detect(&self, title: &str, description: &str) -> Vec<RiskSignal> {
        let text = format!("{title} {description}").to_lowercase();
        self.rules
            .iter()
            .filter(|(_, terms)| terms.iter().any(|t| text.contains(t.as_str())))
            .map(|(signal, _)| *signal)
            .collect()
    }

    /// Replace the record's flags with a fresh detection.
    pub fn apply(&self, podcast: &mut DiscoveredPodcast) {
        let (title, description) = podcast.searchable_text();
        podcast.risk_signals = self.detect(title, description);
    }
}
