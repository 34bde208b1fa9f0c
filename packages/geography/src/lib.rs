#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County boundary polygon fetching.
//!
//! Downloads the U.S. county boundary FeatureCollection used by the
//! choropleth frontend. The format is standard GeoJSON owned by a third
//! party; geometry is carried opaquely and only the 5-digit county FIPS
//! key is interpreted (property `GEOID`, falling back to the top-level
//! feature `id` used by the alternate dataset).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default third-party county boundary dataset (keyed by feature `id`).
pub const DEFAULT_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json";

/// Errors that can occur while fetching boundary data.
#[derive(Debug, Error)]
pub enum GeoError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is not a FeatureCollection.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// A county boundary FeatureCollection, geometry untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountyFeatureCollection {
    /// GeoJSON type tag; must be `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub collection_type: String,
    /// The county features.
    pub features: Vec<CountyFeature>,
}

/// One county feature. Properties beyond the FIPS key are display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountyFeature {
    /// Top-level feature id (the FIPS in the plotly dataset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Feature properties (may carry `GEOID`, `NAME`, `STATE`).
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// Opaque polygon/multipolygon geometry.
    pub geometry: serde_json::Value,
}

impl CountyFeature {
    /// Extracts the 5-digit county FIPS: the `GEOID` property when
    /// present, otherwise the top-level `id`.
    #[must_use]
    pub fn fips(&self) -> Option<&str> {
        self.properties
            .get("GEOID")
            .and_then(serde_json::Value::as_str)
            .or(self.id.as_deref())
    }
}

/// Fetches a county boundary FeatureCollection from a third-party URL.
///
/// No retry and no fallback; a failed fetch surfaces to the caller.
///
/// # Errors
///
/// Returns [`GeoError`] if the request fails or the payload is not a
/// FeatureCollection.
pub async fn fetch_county_boundaries(url: &str) -> Result<CountyFeatureCollection, GeoError> {
    log::info!("Fetching county boundaries from {url}");
    let collection: CountyFeatureCollection = reqwest::get(url)
        .await?
        .error_for_status()?
        .json()
        .await?;

    if collection.collection_type != "FeatureCollection" {
        return Err(GeoError::Conversion {
            message: format!(
                "expected FeatureCollection, got {}",
                collection.collection_type
            ),
        });
    }

    log::info!("Loaded {} county features", collection.features.len());
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fips_prefers_geoid_property() {
        let feature: CountyFeature = serde_json::from_str(
            r#"{
                "id": "99999",
                "properties": {"GEOID": "06075", "NAME": "San Francisco"},
                "geometry": {"type": "Polygon", "coordinates": []}
            }"#,
        )
        .unwrap();
        assert_eq!(feature.fips(), Some("06075"));
    }

    #[test]
    fn fips_falls_back_to_feature_id() {
        let feature: CountyFeature = serde_json::from_str(
            r#"{
                "id": "17031",
                "properties": {"NAME": "Cook"},
                "geometry": {"type": "MultiPolygon", "coordinates": []}
            }"#,
        )
        .unwrap();
        assert_eq!(feature.fips(), Some("17031"));
    }

    #[test]
    fn parses_feature_collection() {
        let collection: CountyFeatureCollection = serde_json::from_str(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"id": "06075", "properties": {}, "geometry": {"type": "Polygon", "coordinates": []}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(collection.collection_type, "FeatureCollection");
        assert_eq!(collection.features.len(), 1);
    }
}
