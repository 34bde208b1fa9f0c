#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the wage map server.
//!
//! Wage records themselves are served in their on-disk snake_case shape
//! (the store serializes transparently); the types here cover the
//! endpoints that add structure on top of the raw data.

use serde::{Deserialize, Serialize};
use wage_map_wage_models::WageBand;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the bands endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandQueryParams {
    /// Normalized (upper-cased) job title to classify against.
    pub job_title: String,
    /// Candidate base salary in USD per year. Clamped server-side to the
    /// valid input range.
    pub salary: f64,
}

/// Per-county classification of a salary for one job title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountyBand {
    /// Competitiveness band.
    pub band: WageBand,
    /// Fixed display color for the band.
    pub color: &'static str,
}

impl From<WageBand> for ApiCountyBand {
    fn from(band: WageBand) -> Self {
        Self {
            band,
            color: band.color(),
        }
    }
}
