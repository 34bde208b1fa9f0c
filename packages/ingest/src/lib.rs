#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Orchestration for building the processed wage dataset.
//!
//! Downloads the configured OFLC disclosure files strictly in sequence,
//! accumulates their rows into one in-memory batch, runs the aggregation
//! pipeline, and writes the flattened store as the processed JSON file
//! the dashboard serves. A failed fetch aborts the run; batches already
//! parsed in that run are discarded with it.

use std::path::Path;

use serde_json::Value;
use wage_map_source::SourceError;
use wage_map_source::download::DisclosureDownload;
use wage_map_source::pipeline::aggregate;
use wage_map_source::reduce::OflcPercentiles;
use wage_map_store::WageRecordStore;

/// OFLC disclosure files consumed by default (CSV exports; edit as OFLC
/// publishes newer releases).
pub const DEFAULT_DATASETS: &[&str] = &[
    "https://www.dol.gov/sites/dolgov/files/ETA/oflc/pdfs/H-1B_Disclosure_Data_FY2023_Q1.csv",
    "https://www.dol.gov/sites/dolgov/files/ETA/oflc/pdfs/H-1B_Disclosure_Data_FY2023_Q2.csv",
    "https://www.dol.gov/sites/dolgov/files/ETA/oflc/pdfs/H-1B_Disclosure_Data_FY2023_Q3.csv",
    "https://www.dol.gov/sites/dolgov/files/ETA/oflc/pdfs/H-1B_Disclosure_Data_FY2023_Q4.csv",
];

/// Errors that can occur during an ingest run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Download or aggregation failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Writing the processed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the processed store failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Downloads every dataset in sequence and accumulates all rows into one
/// batch. `limit` caps the total row count across datasets.
///
/// # Errors
///
/// Returns the first fetch failure; previously fetched batches are
/// dropped with the run.
pub async fn fetch_all(
    urls: &[String],
    limit: Option<u64>,
    gzip: bool,
) -> Result<Vec<Value>, IngestError> {
    let mut all_rows: Vec<Value> = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        log::info!("Downloading dataset {}/{}: {url}", i + 1, urls.len());

        let mut download = DisclosureDownload::new(url).with_gzip(gzip);
        if let Some(limit) = limit {
            let remaining = limit.saturating_sub(all_rows.len() as u64);
            download = download.with_max_rows(remaining);
        }

        let rows = download.fetch().await?;
        log::info!(
            "Dataset {}/{}: {} rows (total so far: {})",
            i + 1,
            urls.len(),
            rows.len(),
            all_rows.len() + rows.len()
        );
        all_rows.extend(rows);

        if let Some(limit) = limit
            && all_rows.len() as u64 >= limit
        {
            log::info!("Reached limit of {limit} rows");
            break;
        }
    }

    Ok(all_rows)
}

/// Reads already-downloaded disclosure CSV files instead of fetching.
///
/// # Errors
///
/// Returns the first read or parse failure.
pub fn read_local(paths: &[std::path::PathBuf]) -> Result<Vec<Value>, IngestError> {
    let mut all_rows: Vec<Value> = Vec::new();

    for path in paths {
        log::info!("Reading {}", path.display());
        let bytes = std::fs::read(path)?;
        let rows = DisclosureDownload::new(&path.display().to_string()).parse(&bytes)?;
        all_rows.extend(rows);
    }

    Ok(all_rows)
}

/// Aggregates a batch of rows and writes the processed store to `output`.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns [`IngestError`] if aggregation aborts (missing columns, empty
/// input) or the output file cannot be written.
pub fn build_and_write(rows: &[Value], output: &Path) -> Result<usize, IngestError> {
    let store = aggregate(rows)?.into_store(&OflcPercentiles);

    for (_, record) in &store {
        if let Err(e) = record.validate() {
            log::warn!("Reduction produced a defective record: {e}");
        }
    }

    write_store(&store, output)?;
    Ok(store.len())
}

/// Writes a store as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`IngestError`] on serialization or file write failure.
pub fn write_store(store: &WageRecordStore, output: &Path) -> Result<(), IngestError> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(store)?;
    std::fs::write(output, json)?;
    log::info!("Wrote {} records to {}", store.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_and_write_round_trips() {
        let rows = vec![
            json!({"job_title": "Engineer", "county_fips": "6075", "prevailing_wage": "$95,000"}),
            json!({"job_title": "Engineer", "county_fips": "6075", "prevailing_wage": "105000"}),
        ];
        let dir = std::env::temp_dir().join("wage_map_ingest_test");
        let output = dir.join("processed.json");

        let written = build_and_write(&rows, &output).unwrap();
        assert_eq!(written, 1);

        let store = WageRecordStore::load(&output).unwrap();
        let rec = store.lookup("06075", "ENGINEER").unwrap();
        assert_eq!(rec.source_count, 2);
        assert!(rec.level_1 <= rec.level_4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn build_fails_on_missing_columns() {
        let rows = vec![json!({"unrelated": "x"})];
        let output = std::env::temp_dir().join("wage_map_ingest_unused.json");
        assert!(build_and_write(&rows, &output).is_err());
    }
}
