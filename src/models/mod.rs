// src/models/mod.rs

//! Domain models for podscout.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod contact;
mod page;
mod podcast;
mod policy;
mod transcript;

// Re-export all public types
pub use config::{Config, Credentials, DiscoveryConfig, FetcherConfig, FinderConfig, OutputConfig};
pub use contact::{ContactCandidate, ContactType, ExtractionMethod, RankedContactPair, SourceUrl};
pub use page::{FeedEpisode, FeedSummary, ParsedPage, SiteReport};
pub use podcast::{DiscoveredPodcast, DiscoverySource, RiskSignal};
pub use policy::{ContactPolicy, RiskPolicy};
pub use transcript::{Transcript, TranscriptSegment};
