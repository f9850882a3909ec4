//! Geographic primitives shared by the search client and the map surface.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl std::fmt::Display for Coordinate {
    /// Formats as `lat,lng`, the shape used by search queries and deep links.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// The geographic region currently visible on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(center: Coordinate, latitude_span: f64, longitude_span: f64) -> Self {
        Self {
            center,
            latitude_span,
            longitude_span,
        }
    }

    /// Whole-country overview shown before the first settled movement.
    #[must_use]
    pub const fn national_overview() -> Self {
        Self::new(Coordinate::new(-30.5595, 22.9375), 10.0, 10.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::national_overview()
    }
}
