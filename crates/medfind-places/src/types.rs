//! Wire types for the nearby-search JSON response.
//!
//! The service wraps results in a `{"status": "OK", "results": [...]}`
//! envelope. Individual records are kept as raw JSON values here and parsed
//! one by one so a single malformed record does not fail the whole search.

use serde::Deserialize;

/// Top-level nearby-search envelope.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A single place record.
#[derive(Debug, Deserialize)]
pub struct PlaceRecord {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}
