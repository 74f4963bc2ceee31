// src/services/dedupe.rs

//! Cross-collaborator dedupe keys for discovered shows.

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::utils::{get_netloc, normalize_name};

/// Derives a stable identity for a show from its platform URL and name.
pub struct DedupeKeys {
    apple_id: Regex,
    spotify_id: Regex,
}

impl DedupeKeys {
    pub fn new() -> Result<Self> {
        Ok(Self {
            apple_id: Regex::new(r"/id(\d+)")?,
            spotify_id: Regex::new(r"/show/([a-zA-Z0-9]+)")?,
        })
    }

    /// `apple:<id>`, `spotify:<id>`, `web:<host[:port]>|<name>` or
    /// `hash:<12 hex>`, tried in that order.
    pub fn key(&self, url: &str, show_name: &str) -> String {
        if let Some(caps) = self.apple_id.captures(url) {
            return format!("apple:{}", &caps[1]);
        }
        if let Some(caps) = self.spotify_id.captures(url) {
            return format!("spotify:{}", &caps[1]);
        }
        if let Some(netloc) = get_netloc(url) {
            return format!("web:{}|{}", netloc, normalize_name(show_name));
        }
        hash_key(url, show_name)
    }
}

fn hash_key(url: &str, show_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(show_name.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("hash:{}", &digest[..12])
}
