//! Gate for viewport-triggered refetches.

use crate::geo::Coordinate;

/// Per-axis movement, in degrees, that must be exceeded before refetching.
pub const DEFAULT_REFETCH_THRESHOLD_DEGREES: f64 = 0.05;

/// Decides whether a settled viewport has moved far enough from the last
/// search origin to warrant a new search.
///
/// Compares latitude and longitude deltas independently against a fixed
/// threshold instead of computing great-circle distance. The comparison is
/// strict: moving exactly the threshold does not trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMovementPolicy {
    threshold_degrees: f64,
}

impl ViewportMovementPolicy {
    #[must_use]
    pub const fn new(threshold_degrees: f64) -> Self {
        Self { threshold_degrees }
    }

    #[must_use]
    pub const fn threshold_degrees(&self) -> f64 {
        self.threshold_degrees
    }

    #[must_use]
    pub fn should_refetch(&self, last_search_origin: Coordinate, new_center: Coordinate) -> bool {
        let d_lat = (last_search_origin.latitude - new_center.latitude).abs();
        let d_lng = (last_search_origin.longitude - new_center.longitude).abs();
        d_lat > self.threshold_degrees || d_lng > self.threshold_degrees
    }
}

impl Default for ViewportMovementPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REFETCH_THRESHOLD_DEGREES)
    }
}
