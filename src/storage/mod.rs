//! Persistence of discovery runs.
//!
//! ## Directory Structure
//!
//! ```text
//! output/
//! ├── latest.json                  # Most recent run
//! └── runs/
//!     ├── 20260301T101500.250Z.json    # One immutable file per run
//!     ├── 20260301T101500.250Z-1.json  # Same instant, later run
//!     └── 20260302T090000.000Z.json
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{DiscoveredPodcast, DiscoverySource};

pub use local::LocalStorage;

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Relative key of the run file
    pub run_key: String,
    /// Number of podcasts written
    pub count: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// One discovery run as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRun {
    /// ISO 8601 timestamp of the run
    pub updated_at: DateTime<Utc>,
    /// Seed of the run, e.g. `seed:Jane Doe`
    pub discovery_source: DiscoverySource,
    /// Total podcast count
    pub count: usize,
    /// The discovered podcasts
    pub podcasts: Vec<DiscoveredPodcast>,
}

impl DiscoveryRun {
    pub fn new(discovery_source: DiscoverySource, podcasts: Vec<DiscoveredPodcast>) -> Self {
        Self {
            updated_at: Utc::now(),
            discovery_source,
            count: podcasts.len(),
            podcasts,
        }
    }

    /// Every record must carry complete email/source pairs.
    pub fn validate(&self) -> Result<()> {
        self.podcasts.iter().try_for_each(DiscoveredPodcast::validate)
    }
}

/// Trait for discovery result storage backends.
#[async_trait]
pub trait ResultStorage: Send + Sync {
    /// Write a run file and replace `latest.json`.
    async fn write_run(&self, run: &DiscoveryRun) -> Result<WriteMetadata>;

    /// Load the most recent run, if any.
    async fn load_latest(&self) -> Result<Option<DiscoveryRun>>;

    /// Load a run by its relative key.
    async fn load_run(&self, run_key: &str) -> Result<Option<DiscoveryRun>>;
}
