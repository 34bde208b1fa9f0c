//! Column resolution for disclosure rows.
//!
//! OFLC disclosure files do not use consistent header names across
//! releases, so each semantic field is resolved by testing an ordered
//! candidate list against the (case/whitespace-normalized) headers of the
//! first row. The first candidate present wins.

use serde_json::Value;

use crate::SourceError;

/// Candidate headers for the job-title field, in precedence order.
pub const ROLE_CANDIDATES: &[&str] = &[
    "job_title",
    "occupation_title",
    "soc_title",
    "role",
    "position_title",
];

/// Candidate headers for the county FIPS field, in precedence order.
pub const FIPS_CANDIDATES: &[&str] = &[
    "worksite_county_fips",
    "county_fips",
    "fips",
    "county_code",
];

/// Candidate headers for the wage amount field, in precedence order.
pub const WAGE_CANDIDATES: &[&str] = &[
    "wage_rate_of_pay_from",
    "prevailing_wage",
    "wage",
    "wage_from",
    "pw_amount",
];

/// Candidate headers for the display county name. Optional.
pub const COUNTY_NAME_CANDIDATES: &[&str] = &["worksite_county", "county"];

/// Candidate headers for the display state label. Optional.
pub const STATE_CANDIDATES: &[&str] = &["worksite_state", "state"];

/// Candidate headers for the pay unit. Optional; rows are assumed annual
/// when no unit column exists.
pub const UNIT_CANDIDATES: &[&str] = &["pw_unit_of_pay", "wage_unit_of_pay"];

/// The actual header names resolved for one input batch.
///
/// Stored as they appear in the rows (original casing), so values can be
/// read back directly from each row object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    /// Header carrying the job title.
    pub role: String,
    /// Header carrying the county FIPS code.
    pub fips: String,
    /// Header carrying the wage amount.
    pub wage: String,
    /// Header carrying the display county name, if present.
    pub county_name: Option<String>,
    /// Header carrying the display state label, if present.
    pub state: Option<String>,
    /// Header carrying the pay unit, if present.
    pub unit: Option<String>,
}

/// Normalizes a header for candidate matching: trimmed, lower-cased.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Finds the original-cased header matching the first candidate present.
fn find_column(headers: &[(String, String)], candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .find(|(normalized, _)| normalized == candidate)
            .map(|(_, original)| original.clone())
    })
}

impl ColumnMap {
    /// Resolves the column map from the first row of a batch.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::EmptyInput`] for an empty batch, or
    /// [`SourceError::MissingColumns`] naming every required field that
    /// could not be resolved.
    pub fn resolve(rows: &[Value]) -> Result<Self, SourceError> {
        let first = rows.first().ok_or(SourceError::EmptyInput)?;
        let object = first.as_object().ok_or_else(|| SourceError::Parse {
            message: "rows must be JSON objects keyed by header".to_string(),
        })?;

        let headers: Vec<(String, String)> = object
            .keys()
            .map(|key| (normalize_key(key), key.clone()))
            .collect();

        let role = find_column(&headers, ROLE_CANDIDATES);
        let fips = find_column(&headers, FIPS_CANDIDATES);
        let wage = find_column(&headers, WAGE_CANDIDATES);

        let mut missing = Vec::new();
        if role.is_none() {
            missing.push("role");
        }
        if fips.is_none() {
            missing.push("fips");
        }
        if wage.is_none() {
            missing.push("wage");
        }
        if !missing.is_empty() {
            return Err(SourceError::MissingColumns { fields: missing });
        }

        Ok(Self {
            role: role.unwrap_or_default(),
            fips: fips.unwrap_or_default(),
            wage: wage.unwrap_or_default(),
            county_name: find_column(&headers, COUNTY_NAME_CANDIDATES),
            state: find_column(&headers, STATE_CANDIDATES),
            unit: find_column(&headers, UNIT_CANDIDATES),
        })
    }
}
