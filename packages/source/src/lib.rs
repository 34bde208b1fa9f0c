#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! OFLC disclosure ingestion and wage aggregation pipeline.
//!
//! Raw disclosure rows (one JSON object per spreadsheet row, keyed by the
//! header names of the first row) flow through column resolution, row
//! normalization, grouping by (role, county FIPS), and a pluggable
//! level-reduction strategy that produces the four prevailing-wage levels
//! per group.

pub mod columns;
pub mod download;
pub mod pipeline;
pub mod reduce;
pub mod rows;

/// Errors that can occur during ingestion.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A required column could not be resolved from the header row.
    /// Fatal to the batch, not to the process.
    #[error("required columns missing: {}", fields.join(", "))]
    MissingColumns {
        /// Semantic names of the unresolved fields (`role`, `fips`, `wage`).
        fields: Vec<&'static str>,
    },

    /// The input batch contained no rows, so no header row exists.
    #[error("input contains no rows")]
    EmptyInput,

    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file read, decompression).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input that is not row-level (row-level defects are
    /// silently dropped).
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}
