#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prevailing wage record and competitiveness band types.
//!
//! This crate defines the canonical per-(county, job title) wage record
//! produced by the aggregation pipeline and served by the API, along with
//! the five-band classification of a candidate salary against the four
//! OFLC prevailing-wage levels.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lower clamp bound for candidate salary inputs, in USD per year.
pub const SALARY_MIN: f64 = 30_000.0;

/// Upper clamp bound for candidate salary inputs, in USD per year.
pub const SALARY_MAX: f64 = 300_000.0;

/// Qualitative competitiveness of a salary against a county's wage levels.
///
/// Ordered best to worst: `Strong > Good > Risky > Unlikely`. `Missing` is
/// a sentinel for counties with no wage record and carries no ordinal
/// meaning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WageBand {
    /// Salary at or above prevailing wage level 3.
    Strong,
    /// Salary at or above level 2 but below level 3.
    Good,
    /// Salary at or above level 1 but below level 2.
    Risky,
    /// Salary below level 1.
    Unlikely,
    /// No wage record for the (county, job title) pair.
    Missing,
}

impl WageBand {
    /// Classifies a salary against a county's wage levels.
    ///
    /// Thresholds are inclusive: a salary exactly equal to a level resolves
    /// to the higher band. Total for any finite salary; clamping the salary
    /// to [`SALARY_MIN`]..[`SALARY_MAX`] is the caller's responsibility.
    #[must_use]
    pub fn classify(salary: f64, record: Option<&WageRecord>) -> Self {
        let Some(record) = record else {
            return Self::Missing;
        };
        if salary >= record.level_3 {
            Self::Strong
        } else if salary >= record.level_2 {
            Self::Good
        } else if salary >= record.level_1 {
            Self::Risky
        } else {
            Self::Unlikely
        }
    }

    /// Returns the fixed display color for this band as a hex code.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Strong => "#16a34a",
            Self::Good => "#2563eb",
            Self::Risky => "#eab308",
            Self::Unlikely => "#dc2626",
            Self::Missing => "#cbd5e1",
        }
    }

    /// Numeric rank for ordering checks: 4 (best) down to 1 (worst),
    /// with 0 for the `Missing` sentinel.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Strong => 4,
            Self::Good => 3,
            Self::Risky => 2,
            Self::Unlikely => 1,
            Self::Missing => 0,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Strong,
            Self::Good,
            Self::Risky,
            Self::Unlikely,
            Self::Missing,
        ]
    }
}

/// The four OFLC prevailing-wage levels for one (county, job title) group.
///
/// Invariant: `level_1 <= level_2 <= level_3 <= level_4`, all positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WageLevels {
    /// Level 1 (entry) annual wage.
    pub level_1: f64,
    /// Level 2 (qualified) annual wage.
    pub level_2: f64,
    /// Level 3 (experienced) annual wage.
    pub level_3: f64,
    /// Level 4 (fully competent) annual wage.
    pub level_4: f64,
}

impl WageLevels {
    /// Whether the levels are positive and non-decreasing.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.level_1 > 0.0
            && self.level_1 <= self.level_2
            && self.level_2 <= self.level_3
            && self.level_3 <= self.level_4
    }
}

/// One aggregated wage record per (county, job title) pair.
///
/// Field names match the on-disk JSON produced by the ingest pipeline and
/// served at `/data/h1b_wage_by_county_job.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageRecord {
    /// 5-character zero-padded county FIPS code.
    pub county_fips: String,
    /// Display county name, non-authoritative.
    pub county_name: String,
    /// Display state label, non-authoritative.
    pub state: String,
    /// Normalized (trimmed, upper-cased) job title.
    pub job_title: String,
    /// Level 1 (entry) annual wage.
    pub level_1: f64,
    /// Level 2 (qualified) annual wage.
    pub level_2: f64,
    /// Level 3 (experienced) annual wage.
    pub level_3: f64,
    /// Level 4 (fully competent) annual wage.
    pub level_4: f64,
    /// Number of raw disclosure rows aggregated into this record.
    pub source_count: u64,
}

impl WageRecord {
    /// Composite store key for this record: `"{county_fips}_{job_title}"`.
    #[must_use]
    pub fn key(&self) -> String {
        store_key(&self.county_fips, &self.job_title)
    }

    /// Checks the data-quality invariants: a 5-digit FIPS, positive
    /// non-decreasing levels, and at least one source row.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordError`] naming the violated invariant.
    pub fn validate(&self) -> Result<(), InvalidRecordError> {
        if self.county_fips.len() != 5 || !self.county_fips.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidRecordError {
                key: self.key(),
                reason: "county_fips is not 5 digits",
            });
        }
        let levels = WageLevels {
            level_1: self.level_1,
            level_2: self.level_2,
            level_3: self.level_3,
            level_4: self.level_4,
        };
        if !levels.is_monotonic() {
            return Err(InvalidRecordError {
                key: self.key(),
                reason: "wage levels are not positive and non-decreasing",
            });
        }
        if self.source_count == 0 {
            return Err(InvalidRecordError {
                key: self.key(),
                reason: "source_count must be >= 1",
            });
        }
        Ok(())
    }
}

/// Builds the composite store key `"{county_fips}_{job_title}"`.
///
/// The job title is assumed already normalized (trimmed, upper-cased).
#[must_use]
pub fn store_key(county_fips: &str, job_title: &str) -> String {
    format!("{county_fips}_{job_title}")
}

/// Error returned when a [`WageRecord`] violates its data-quality
/// invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecordError {
    /// Composite key of the offending record.
    pub key: String,
    /// The violated invariant.
    pub reason: &'static str,
}

impl std::fmt::Display for InvalidRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid wage record {}: {}", self.key, self.reason)
    }
}

impl std::error::Error for InvalidRecordError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WageRecord {
        WageRecord {
            county_fips: "06075".to_string(),
            county_name: "San Francisco".to_string(),
            state: "CA".to_string(),
            job_title: "SOFTWARE ENGINEER".to_string(),
            level_1: 90_000.0,
            level_2: 110_000.0,
            level_3: 130_000.0,
            level_4: 150_000.0,
            source_count: 12,
        }
    }

    #[test]
    fn classify_absent_record_is_missing() {
        for salary in [0.0, 50_000.0, 1_000_000.0] {
            assert_eq!(WageBand::classify(salary, None), WageBand::Missing);
        }
    }

    #[test]
    fn classify_thresholds_are_inclusive() {
        let rec = record();
        assert_eq!(WageBand::classify(130_000.0, Some(&rec)), WageBand::Strong);
        assert_eq!(WageBand::classify(110_000.0, Some(&rec)), WageBand::Good);
        assert_eq!(WageBand::classify(109_999.0, Some(&rec)), WageBand::Risky);
        assert_eq!(WageBand::classify(90_000.0, Some(&rec)), WageBand::Risky);
        assert_eq!(
            WageBand::classify(89_999.0, Some(&rec)),
            WageBand::Unlikely
        );
    }

    #[test]
    fn classify_is_monotonic_in_salary() {
        let rec = record();
        let mut prev = 0;
        for salary in (0..200).map(|s| f64::from(s) * 1_000.0) {
            let rank = WageBand::classify(salary, Some(&rec)).rank();
            assert!(rank >= prev, "band rank decreased at salary {salary}");
            prev = rank;
        }
    }

    #[test]
    fn every_band_has_a_color() {
        for band in WageBand::all() {
            assert!(band.color().starts_with('#'));
        }
    }

    #[test]
    fn band_serializes_lowercase() {
        let json = serde_json::to_string(&WageBand::Strong).unwrap();
        assert_eq!(json, "\"strong\"");
    }

    #[test]
    fn validate_accepts_well_formed_record() {
        assert!(record().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_monotonic_levels() {
        let mut rec = record();
        rec.level_2 = rec.level_3 + 1.0;
        let err = rec.validate().unwrap_err();
        assert!(err.reason.contains("non-decreasing"));
    }

    #[test]
    fn validate_rejects_bad_fips() {
        let mut rec = record();
        rec.county_fips = "6075".to_string();
        assert!(rec.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_source_count() {
        let mut rec = record();
        rec.source_count = 0;
        assert!(rec.validate().is_err());
    }

    #[test]
    fn composite_key_shape() {
        assert_eq!(record().key(), "06075_SOFTWARE ENGINEER");
    }
}
