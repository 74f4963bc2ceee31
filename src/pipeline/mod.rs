//! Pipeline entry points for podscout operations.
//!
//! - `run_discovery`: Search by guest or category, enrich, persist the run
//! - `run_contacts`: Ranked contacts for a single show
//! - `run_inspect`: Page metadata and feed summary for one URL
//! - `run_transcripts`: Cleaned transcripts for videos
//! - `run_validate`: Check configuration and the latest stored run

pub mod contacts;
pub mod discover;
pub mod inspect;
pub mod transcripts;
pub mod validate;

pub use contacts::{build_finder, run_contacts};
pub use discover::{build_engine, discover, run_discovery};
pub use inspect::run_inspect;
pub use transcripts::{DEFAULT_MAX_LENGTH, TranscriptOutput, run_transcripts};
pub use validate::run_validate;
