//! Tutor Index - command line entry point
//!
//! Runs the index-building pipeline stage by stage (or all at once), ranks
//! tutors for a decklist file, and serves the index over HTTP.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tutor_index::config::{
    cache_ttl_from_hours, default_data_dir, DataPaths, Settings, DEFAULT_FORMAT,
};
use tutor_index::fetcher::SCRYFALL_API;
use tutor_index::{pipeline, web, Result};

/// Builds a card -> tutors index from Scryfall and ranks tutors for decklists
#[derive(Parser, Debug)]
#[command(name = "tutor_index")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding bulk data, tutor files, the index and the cache
    #[arg(short, long, global = true, default_value_t = default_data_dir().to_string_lossy().to_string())]
    data_dir: String,

    /// Scryfall API base URL
    #[arg(long, global = true, default_value = SCRYFALL_API)]
    api_base: String,

    /// Seconds to wait between Scryfall requests
    #[arg(long, global = true, default_value_t = 6)]
    delay_secs: u64,

    /// Hours a cached Scryfall response stays fresh
    #[arg(long, global = true, default_value_t = 12)]
    cache_ttl_hours: u64,

    /// Game format tutors and searches are scoped to
    #[arg(short, long, global = true, default_value = DEFAULT_FORMAT)]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch all tutors and scrape their related searches
    Collect,
    /// Apply customTutorSearches.json overrides to the scraped searches
    Merge,
    /// Resolve every related search into card names
    Resolve,
    /// Build tutoredByMap.json from resolved searches and bulk data
    BuildIndex,
    /// Run collect, merge, resolve and build-index in order
    Run,
    /// Run a single Scryfall search
    Fetch {
        query: String,
        /// Save the card records to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Count tutors that have related searches
    Stats {
        /// Tutor file to inspect (default: tutorsWithSearches.json)
        file: Option<PathBuf>,
    },
    /// Rank tutors for a decklist file
    Deck { decklist: PathBuf },
    /// Serve the index and decklist ranking over HTTP
    Serve {
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=tutor_index=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        log::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings {
        paths: DataPaths::new(PathBuf::from(&args.data_dir)),
        api_base: args.api_base,
        delay: Duration::from_secs(args.delay_secs),
        cache_ttl: cache_ttl_from_hours(args.cache_ttl_hours),
        format: args.format,
    };
    log::debug!("Data directory: {}", settings.paths.root().display());

    match args.command {
        Command::Collect => {
            pipeline::collect(&settings).await?;
        }
        Command::Merge => {
            pipeline::merge(&settings.paths)?;
        }
        Command::Resolve => {
            pipeline::resolve(&settings).await?;
        }
        Command::BuildIndex => {
            pipeline::build_index(&settings.paths)?;
        }
        Command::Run => {
            let index = pipeline::run_all(&settings).await?;
            log::info!("Pipeline finished, {} cards indexed", index.len());
        }
        Command::Fetch { query, output } => {
            let cards = pipeline::fetch_query(&settings, &query, output.as_deref()).await?;
            println!("Found {} cards in total.", cards.len());
        }
        Command::Stats { file } => {
            let path = file.unwrap_or_else(|| settings.paths.scraped_tutors());
            let stats = pipeline::count_related_searches(&path)?;
            println!(
                "Tutors with non-empty relatedSearches: {} of {}",
                stats.with_searches, stats.total
            );
        }
        Command::Deck { decklist } => {
            let index = pipeline::load_index(&settings.paths)?;
            let ranked = pipeline::resolve_deck_file(&index, &decklist)?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Command::Serve { port } => {
            let index = pipeline::load_index(&settings.paths)?;
            web::serve(index, port).await?;
        }
    }

    Ok(())
}
