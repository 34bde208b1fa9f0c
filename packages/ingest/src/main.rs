#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the wage data ingestion tool.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use wage_map_ingest::{DEFAULT_DATASETS, build_and_write, fetch_all, read_local};

#[derive(Parser)]
#[command(name = "wage_map_ingest", about = "OFLC wage data ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the configured disclosure files and build the processed
    /// wage dataset
    Sync {
        /// Comma-separated list of disclosure file URLs (overrides the
        /// built-in OFLC dataset list)
        #[arg(long)]
        sources: Option<String>,
        /// Output path for the processed JSON
        #[arg(long, default_value = "data/processed/h1b_wage_by_county_job.json")]
        output: PathBuf,
        /// Maximum total number of rows across all datasets (for testing)
        #[arg(long)]
        limit: Option<u64>,
        /// Treat downloads as gzip-compressed
        #[arg(long)]
        gzip: bool,
    },
    /// Build the processed dataset from already-downloaded CSV files
    Local {
        /// Disclosure CSV files to aggregate
        files: Vec<PathBuf>,
        /// Output path for the processed JSON
        #[arg(long, default_value = "data/processed/h1b_wage_by_county_job.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Sync {
            sources,
            output,
            limit,
            gzip,
        } => {
            let urls: Vec<String> = sources.map_or_else(
                || DEFAULT_DATASETS.iter().map(ToString::to_string).collect(),
                |s| s.split(',').map(|u| u.trim().to_string()).collect(),
            );

            let rows = fetch_all(&urls, limit, gzip).await?;
            let written = build_and_write(&rows, &output)?;
            log::info!(
                "Sync complete: {written} records from {} rows in {:.1?}",
                rows.len(),
                start.elapsed()
            );
        }
        Commands::Local { files, output } => {
            let rows = read_local(&files)?;
            let written = build_and_write(&rows, &output)?;
            log::info!(
                "Aggregated {written} records from {} rows in {:.1?}",
                rows.len(),
                start.elapsed()
            );
        }
    }

    Ok(())
}
