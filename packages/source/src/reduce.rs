//! Reduction strategies for grouped wage observations.
//!
//! The dashboard dataset carries four prevailing-wage levels per group.
//! How an observation list becomes four levels is a pluggable strategy:
//! the production strategy mirrors the OFLC wage-level methodology
//! (percentiles at fixed ranks), which is monotone by construction even
//! for distributions with ties.

use wage_map_wage_models::WageLevels;

/// Reduces a group's wage observations to the four ordered wage levels.
///
/// Implementations receive the observations sorted ascending and must
/// return levels satisfying `level_1 <= level_2 <= level_3 <= level_4`.
pub trait LevelReduction {
    /// Reduces a non-empty ascending-sorted slice to four levels.
    /// Returns `None` for an empty slice.
    fn reduce(&self, sorted: &[f64]) -> Option<WageLevels>;
}

/// OFLC wage-level methodology: the four levels are the 17th, 34th, 50th,
/// and 67th percentiles of the observed wage distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct OflcPercentiles;

impl LevelReduction for OflcPercentiles {
    fn reduce(&self, sorted: &[f64]) -> Option<WageLevels> {
        if sorted.is_empty() {
            return None;
        }
        Some(WageLevels {
            level_1: percentile(sorted, 17),
            level_2: percentile(sorted, 34),
            level_3: percentile(sorted, 50),
            level_4: percentile(sorted, 67),
        })
    }
}

/// Nearest-rank percentile over an ascending-sorted, non-empty slice.
///
/// # Panics
///
/// Panics on an empty slice; callers guard for emptiness.
#[must_use]
pub fn percentile(sorted: &[f64], pct: u8) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!(pct <= 100);
    let n = sorted.len();
    // Nearest-rank: ceil(p/100 * n), clamped to [1, n].
    let rank = (usize::from(pct) * n).div_ceil(100).clamp(1, n);
    sorted[rank - 1]
}

/// Arithmetic mean, the minimal single-statistic reduction used for
/// ad-hoc per-role queries. Returns `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Some(values.iter().sum::<f64>() / count)
}
