//! podscout CLI
//!
//! Discover podcasts, find their contact emails and pull transcripts.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use podscout::{
    error::Result,
    models::{Config, DiscoverySource},
    pipeline,
    storage::LocalStorage,
};
use serde::Serialize;

/// podscout - Podcast discovery and contact finder
#[derive(Parser, Debug)]
#[command(
    name = "podscout",
    version,
    about = "Podcast discovery with source-backed contact emails"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "podscout.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find podcasts by seed guest or category
    #[command(group(
        ArgGroup::new("seed")
            .required(true)
            .args(["guest", "category"])
    ))]
    Discover {
        /// Guest whose appearances seed the search
        #[arg(long)]
        guest: Option<String>,

        /// Category or topic query
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of podcasts (default: discovery.default_max_results)
        #[arg(long)]
        max: Option<usize>,

        /// Resolve websites and find contacts for every result
        #[arg(long)]
        enrich: bool,

        /// Output directory (default: output.dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Find ranked contact emails for one show
    Contacts {
        /// Show name
        #[arg(long)]
        name: String,

        /// Show website
        #[arg(long)]
        website: Option<String>,

        /// Social profile URLs to scan as well
        #[arg(long = "social")]
        social: Vec<String>,
    },

    /// Print page metadata and feed summary for a URL
    Inspect {
        url: String,
    },

    /// Fetch transcripts for YouTube videos (URLs or IDs)
    Transcript {
        #[arg(required = true)]
        videos: Vec<String>,

        /// Print the untruncated text and every segment
        #[arg(long)]
        full: bool,

        /// Maximum characters of summarized text
        #[arg(long, default_value_t = pipeline::DEFAULT_MAX_LENGTH)]
        max_length: usize,

        /// Write the JSON to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration and the latest stored run
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Using configuration from {}", cli.config.display());

    match cli.command {
        Command::Discover {
            guest,
            category,
            max,
            enrich,
            output,
        } => {
            let seed = match (guest, category) {
                (Some(name), _) => DiscoverySource::Guest(name),
                (None, Some(query)) => DiscoverySource::Category(query),
                (None, None) => DiscoverySource::Unassigned,
            };
            let max = max.unwrap_or(config.discovery.default_max_results);
            let dir = output.unwrap_or_else(|| PathBuf::from(&config.output.dir));
            let storage = LocalStorage::new(dir);

            let run = pipeline::run_discovery(&config, &storage, &seed, max, enrich).await?;
            print_json(&run.podcasts)?;
            log::info!("Run stored under {}", storage.root().display());
        }

        Command::Contacts {
            name,
            website,
            social,
        } => {
            let pair = pipeline::run_contacts(&config, &name, website.as_deref(), &social).await?;
            print_json(&pair)?;
        }

        Command::Inspect { url } => {
            let report = pipeline::run_inspect(&config, &url).await?;
            print_json(&report)?;
        }

        Command::Transcript {
            videos,
            full,
            max_length,
            output,
        } => {
            let transcripts = pipeline::run_transcripts(&config, &videos, full, max_length).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, serde_json::to_string_pretty(&transcripts)?)?;
                    log::info!("Saved {} transcripts to {}", transcripts.len(), path.display());
                }
                None => print_json(&transcripts)?,
            }
        }

        Command::Validate => {
            let storage = LocalStorage::new(&config.output.dir);
            pipeline::run_validate(&config, &storage).await?;
            log::info!("All validations passed!");
        }
    }

    Ok(())
}
