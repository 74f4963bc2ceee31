// src/services/ranker.rs

//! Deduplication and ordering of contact candidates.

use std::collections::HashMap;

use crate::models::{ContactCandidate, RankedContactPair};

/// Dedupe by email and sort by `(type priority, confidence desc)`.
///
/// A duplicate replaces the kept entry only with a strictly higher
/// confidence, and the replacement takes over the first-seen position so
/// the stable sort stays deterministic.
pub fn rank_contacts(candidates: Vec<ContactCandidate>) -> Vec<ContactCandidate> {
    let mut ranked: Vec<ContactCandidate> = Vec::with_capacity(candidates.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        match index.get(candidate.email()) {
            Some(&pos) => {
                if candidate.confidence() > ranked[pos].confidence() {
                    ranked[pos] = candidate;
                }
            }
            None => {
                index.insert(candidate.email().to_string(), ranked.len());
                ranked.push(candidate);
            }
        }
    }

    ranked.sort_by(|a, b| {
        a.contact_type()
            .priority()
            .cmp(&b.contact_type().priority())
            .then_with(|| b.confidence().total_cmp(&a.confidence()))
    });
    ranked
}

/// Rank and keep the top two.
pub fn top_pair(candidates: Vec<ContactCandidate>) -> RankedContactPair {
    RankedContactPair::from_ranked(rank_contacts(candidates))
}
