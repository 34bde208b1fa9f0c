#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable keyed store of aggregated wage records.
//!
//! The store maps the composite key `"{county_fips}_{job_title}"` to a
//! [`WageRecord`]. It is built once per data load (from the aggregation
//! pipeline or the processed JSON file), treated as read-only afterward,
//! and replaced wholesale on reload.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wage_map_wage_models::{WageRecord, store_key};

/// Errors that can occur while loading a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File read failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only snapshot of wage records keyed by `"{county_fips}_{job_title}"`.
///
/// Serializes as a flat JSON object, matching the on-disk
/// `h1b_wage_by_county_job.json` shape. `BTreeMap` keeps the serialized key
/// order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WageRecordStore {
    records: BTreeMap<String, WageRecord>,
}

impl WageRecordStore {
    /// Builds a store from an iterator of records, keying each by its
    /// composite key. Later duplicates replace earlier ones.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = WageRecord>,
    {
        Self {
            records: records.into_iter().map(|r| (r.key(), r)).collect(),
        }
    }

    /// Loads a store from a processed JSON file.
    ///
    /// Records violating the wage-level invariants are kept (they are
    /// display data) but logged at warn level, since a violation means the
    /// upstream aggregation produced a defective file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&contents)?;
        for record in store.records.values() {
            if let Err(e) = record.validate() {
                log::warn!("Loaded defective record: {e}");
            }
        }
        log::info!(
            "Loaded {} wage records from {}",
            store.records.len(),
            path.display()
        );
        Ok(store)
    }

    /// Exact composite-key lookup. No fuzzy or partial matching.
    #[must_use]
    pub fn lookup(&self, county_fips: &str, job_title: &str) -> Option<&WageRecord> {
        self.records.get(&store_key(county_fips, job_title))
    }

    /// Returns the distinct job titles in the store, lexicographically
    /// sorted (case-sensitive on the normalized upper-cased form).
    #[must_use]
    pub fn job_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .records
            .values()
            .map(|r| r.job_title.clone())
            .collect();
        titles.sort();
        titles.dedup();
        titles
    }

    /// Iterates over all records with their composite keys.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WageRecord)> {
        self.records.iter()
    }

    /// All records for one job title, keyed by county FIPS.
    #[must_use]
    pub fn records_for_title(&self, job_title: &str) -> BTreeMap<&str, &WageRecord> {
        self.records
            .values()
            .filter(|r| r.job_title == job_title)
            .map(|r| (r.county_fips.as_str(), r))
            .collect()
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store contains no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a WageRecordStore {
    type Item = (&'a String, &'a WageRecord);
    type IntoIter = std::collections::btree_map::Iter<'a, String, WageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
