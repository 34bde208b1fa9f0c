//! Per-row normalization and filtering.
//!
//! Each disclosure row is normalized independently; a row failing any
//! filter is dropped without individual reporting. Only aggregate counts
//! are surfaced by the pipeline.

use serde_json::Value;

use crate::columns::ColumnMap;

/// Multipliers converting a pay unit to an annual wage.
///
/// Keys are matched against the trimmed, lower-cased unit value.
pub const UNIT_TO_ANNUAL: &[(&str, f64)] = &[
    ("year", 1.0),
    ("yr", 1.0),
    ("hour", 2080.0),
    ("hr", 2080.0),
    ("week", 52.0),
    ("wk", 52.0),
    ("bi-weekly", 26.0),
    ("month", 12.0),
    ("day", 260.0),
];

/// One surviving observation: a normalized (role, county, annual wage)
/// triple plus optional display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Trimmed, upper-cased job title.
    pub role: String,
    /// 5-digit zero-padded county FIPS.
    pub fips: String,
    /// Annualized wage, finite and positive.
    pub wage: f64,
    /// Display county name, if the batch carried one.
    pub county_name: Option<String>,
    /// Display state label, if the batch carried one.
    pub state: Option<String>,
}

/// Reads a row field as a display string (numbers are formatted).
fn field_str(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Parses a raw wage value: strips currency symbols, commas, and
/// whitespace, then parses as a number. Returns `None` if the result is
/// not finite or not positive.
#[must_use]
pub fn parse_wage(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    let parsed = cleaned.parse::<f64>().ok()?;
    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}

/// Normalizes a raw FIPS value: trims and left-zero-pads to 5 characters.
/// Returns `None` unless the padded value is exactly 5 digits, and rejects
/// the `00000` unknown-county sentinel.
#[must_use]
pub fn normalize_fips(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let padded = format!("{trimmed:0>5}");
    if padded.len() == 5 && padded.bytes().all(|b| b.is_ascii_digit()) && padded != "00000" {
        Some(padded)
    } else {
        None
    }
}

/// Converts a wage to annual using the pay unit. An empty unit means the
/// wage is already annual; an unrecognized unit rejects the row.
#[must_use]
pub fn annualize(wage: f64, unit: &str) -> Option<f64> {
    let normalized = unit.trim().to_lowercase();
    if normalized.is_empty() {
        return Some(wage);
    }
    UNIT_TO_ANNUAL
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, factor)| wage * factor)
}

/// Normalizes one row into an [`Observation`], or `None` if any filter
/// rejects it (empty role, non-positive wage, malformed FIPS, unknown pay
/// unit).
#[must_use]
pub fn normalize_row(row: &Value, columns: &ColumnMap) -> Option<Observation> {
    let role = field_str(row, &columns.role).trim().to_uppercase();
    if role.is_empty() {
        return None;
    }

    let wage = parse_wage(&field_str(row, &columns.wage))?;
    let wage = match &columns.unit {
        Some(unit_col) => annualize(wage, &field_str(row, unit_col))?,
        None => wage,
    };

    let fips = normalize_fips(&field_str(row, &columns.fips))?;

    let display = |column: &Option<String>| {
        column
            .as_ref()
            .map(|c| field_str(row, c).trim().to_string())
            .filter(|s| !s.is_empty())
    };

    Some(Observation {
        role,
        fips,
        wage,
        county_name: display(&columns.county_name),
        state: display(&columns.state).map(|s| s.to_uppercase()),
    })
}
