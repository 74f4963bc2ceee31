//! Service layer for podscout.
//!
//! This module contains the business logic for:
//! - Contact extraction, validation, classification and ranking
//! - Contact finding over a show's website (`ContactFinder`)
//! - Podcast discovery and enrichment (`DiscoveryEngine`)
//! - Page metadata, RSS feeds and transcripts

pub mod classifier;
pub mod dedupe;
pub mod discovery;
pub mod extractor;
pub mod feed;
pub mod finder;
pub mod page;
pub mod ranker;
pub mod risk;
pub mod sources;
pub mod transcripts;
pub mod validator;

pub use classifier::ContactClassifier;
pub use dedupe::DedupeKeys;
pub use discovery::{DiscoveryEngine, GuestSearch, TopicSearch, WebsiteResolver};
pub use extractor::{EmailExtractor, RawEmail};
pub use feed::parse_feed;
pub use finder::{ContactFinder, DirectorySearch, FinderProfile, PageScan};
pub use page::PageParser;
pub use ranker::rank_contacts;
pub use risk::RiskDetector;
pub use transcripts::{TimedTextSource, TranscriptFetcher, TranscriptSource};
pub use validator::{EmailValidator, ValidationMode};
