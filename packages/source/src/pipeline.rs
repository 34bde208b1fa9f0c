//! The aggregation pipeline: rows in, grouped wages out.
//!
//! A pure transformation: the grouped structure is returned as a value,
//! never accumulated in module state, so the pipeline is independently
//! testable and idempotent over the same input rows.

use std::collections::BTreeMap;

use serde_json::Value;
use wage_map_store::WageRecordStore;
use wage_map_wage_models::WageRecord;

use crate::SourceError;
use crate::columns::ColumnMap;
use crate::reduce::{LevelReduction, mean};
use crate::rows::normalize_row;

/// Role → county FIPS → wage observations in arrival order.
pub type GroupedWages = BTreeMap<String, BTreeMap<String, Vec<f64>>>;

/// Display metadata observed for one county (first non-empty value wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CountyDisplay {
    county_name: Option<String>,
    state: Option<String>,
}

/// The pipeline's output: grouped observations plus per-county display
/// metadata, ready for reduction into a [`WageRecordStore`].
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    groups: GroupedWages,
    display: BTreeMap<String, CountyDisplay>,
}

/// Resolves columns against the batch headers, normalizes every row, and
/// groups the survivors by (role, county FIPS).
///
/// Rows failing a filter are dropped silently; only aggregate counts are
/// logged.
///
/// # Errors
///
/// Returns [`SourceError::EmptyInput`] for an empty batch or
/// [`SourceError::MissingColumns`] if a required column cannot be
/// resolved. Either aborts the batch.
pub fn aggregate(rows: &[Value]) -> Result<Aggregation, SourceError> {
    let columns = ColumnMap::resolve(rows)?;
    log::debug!(
        "Resolved columns: role={}, fips={}, wage={}",
        columns.role,
        columns.fips,
        columns.wage
    );

    let mut aggregation = Aggregation::default();
    let mut matched: u64 = 0;

    for row in rows {
        let Some(obs) = normalize_row(row, &columns) else {
            continue;
        };
        matched += 1;

        aggregation
            .groups
            .entry(obs.role)
            .or_default()
            .entry(obs.fips.clone())
            .or_default()
            .push(obs.wage);

        let display = aggregation.display.entry(obs.fips).or_default();
        if display.county_name.is_none() {
            display.county_name = obs.county_name;
        }
        if display.state.is_none() {
            display.state = obs.state;
        }
    }

    log::info!(
        "Aggregated {matched}/{} rows into {} roles",
        rows.len(),
        aggregation.groups.len()
    );

    Ok(aggregation)
}

impl Aggregation {
    /// The grouped intermediate: role → county FIPS → observations.
    #[must_use]
    pub const fn groups(&self) -> &GroupedWages {
        &self.groups
    }

    /// Number of distinct roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no rows survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Mean wage per county for one role — the minimal single-statistic
    /// query used for ad-hoc comparisons. Empty if the role is unknown.
    #[must_use]
    pub fn mean_by_county(&self, role: &str) -> BTreeMap<String, f64> {
        self.groups
            .get(role)
            .map(|counties| {
                counties
                    .iter()
                    .filter_map(|(fips, wages)| mean(wages).map(|m| (fips.clone(), m)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Flattens the aggregation into a [`WageRecordStore`], reducing each
    /// (role, county) group to four wage levels with the given strategy.
    ///
    /// Levels are rounded to whole dollars. Observations are sorted before
    /// reduction, so the result is independent of row arrival order.
    #[must_use]
    pub fn into_store(self, reduction: &dyn LevelReduction) -> WageRecordStore {
        let mut records = Vec::new();

        for (role, counties) in &self.groups {
            for (fips, wages) in counties {
                let mut sorted = wages.clone();
                sorted.sort_by(f64::total_cmp);
                let Some(levels) = reduction.reduce(&sorted) else {
                    continue;
                };

                let display = self.display.get(fips);
                records.push(WageRecord {
                    county_fips: fips.clone(),
                    county_name: display
                        .and_then(|d| d.county_name.clone())
                        .unwrap_or_default(),
                    state: display.and_then(|d| d.state.clone()).unwrap_or_default(),
                    job_title: role.clone(),
                    level_1: levels.level_1.round(),
                    level_2: levels.level_2.round(),
                    level_3: levels.level_3.round(),
                    level_4: levels.level_4.round(),
                    source_count: wages.len() as u64,
                });
            }
        }

        WageRecordStore::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::OflcPercentiles;
    use serde_json::json;

    fn sample_rows() -> Vec<Value> {
        vec![
            json!({"occupation_title": "Engineer", "county_code": "6075", "pw_amount": "$95,000"}),
            json!({"occupation_title": "engineer ", "county_code": "06075", "pw_amount": "105000"}),
            json!({"occupation_title": "Engineer", "county_code": "17031", "pw_amount": "88000"}),
            json!({"occupation_title": "Accountant", "county_code": "6075", "pw_amount": "72000"}),
            // Rejected rows: bad wage, bad FIPS, empty role.
            json!({"occupation_title": "Engineer", "county_code": "6075", "pw_amount": "-10"}),
            json!({"occupation_title": "Engineer", "county_code": "1234567", "pw_amount": "90000"}),
            json!({"occupation_title": "", "county_code": "6075", "pw_amount": "90000"}),
        ]
    }

    #[test]
    fn groups_by_role_and_padded_fips() {
        let agg = aggregate(&sample_rows()).unwrap();
        let engineer = &agg.groups()["ENGINEER"];
        assert_eq!(engineer["06075"], vec![95_000.0, 105_000.0]);
        assert_eq!(engineer["17031"], vec![88_000.0]);
        assert_eq!(agg.groups()["ACCOUNTANT"]["06075"], vec![72_000.0]);
    }

    #[test]
    fn rejected_rows_appear_in_no_group() {
        let agg = aggregate(&sample_rows()).unwrap();
        let total: usize = agg
            .groups()
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn mean_by_county_for_one_role() {
        let agg = aggregate(&sample_rows()).unwrap();
        let means = agg.mean_by_county("ENGINEER");
        assert!((means["06075"] - 100_000.0).abs() < f64::EPSILON);
        assert!((means["17031"] - 88_000.0).abs() < f64::EPSILON);
        assert!(agg.mean_by_county("PILOT").is_empty());
    }

    #[test]
    fn aggregation_is_order_invariant() {
        let mut reversed = sample_rows();
        reversed.reverse();
        let a = aggregate(&sample_rows()).unwrap();
        let b = aggregate(&reversed).unwrap();

        let store_a = a.into_store(&OflcPercentiles);
        let store_b = b.into_store(&OflcPercentiles);
        assert_eq!(store_a, store_b);
    }

    #[test]
    fn store_records_satisfy_invariants() {
        let store = aggregate(&sample_rows())
            .unwrap()
            .into_store(&OflcPercentiles);
        assert_eq!(store.len(), 3);
        for (_, record) in &store {
            record.validate().unwrap();
        }
        let rec = store.lookup("06075", "ENGINEER").unwrap();
        assert_eq!(rec.source_count, 2);
    }

    #[test]
    fn display_metadata_flows_into_records() {
        let rows = vec![json!({
            "job_title": "Engineer",
            "worksite_county_fips": "6075",
            "wage_rate_of_pay_from": "95000",
            "worksite_county": "San Francisco",
            "worksite_state": "CA"
        })];
        let store = aggregate(&rows).unwrap().into_store(&OflcPercentiles);
        let rec = store.lookup("06075", "ENGINEER").unwrap();
        assert_eq!(rec.county_name, "San Francisco");
        assert_eq!(rec.state, "CA");
    }

    #[test]
    fn missing_columns_abort_the_batch() {
        let rows = vec![json!({"foo": "bar"})];
        assert!(matches!(
            aggregate(&rows),
            Err(SourceError::MissingColumns { .. })
        ));
    }
}
