//! Device permission and positioning seam.

use async_trait::async_trait;
use medfind_core::{Coordinate, LocationPrecision};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    /// The permission prompt itself could not be shown or answered.
    #[error("location permission request failed: {0}")]
    PermissionRequest(String),

    /// Positioning hardware or service failed to produce a fix.
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
}

/// Obtains location permission and the device's current position.
///
/// Either call may prompt the user through the host OS.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn request_permission(&self) -> Result<PermissionStatus, GeolocationError>;

    async fn current_coordinate(
        &self,
        precision: LocationPrecision,
    ) -> Result<Coordinate, GeolocationError>;
}

/// A provider that always grants permission and reports one fixed position.
///
/// Used by headless hosts where the caller already knows where the user is.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinate: Coordinate,
}

impl FixedLocation {
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl GeolocationProvider for FixedLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, GeolocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn current_coordinate(
        &self,
        precision: LocationPrecision,
    ) -> Result<Coordinate, GeolocationError> {
        if !self.coordinate.is_finite() {
            return Err(GeolocationError::LocationUnavailable(format!(
                "non-finite fixed coordinate {}",
                self.coordinate
            )));
        }
        tracing::debug!(coordinate = %self.coordinate, %precision, "reporting fixed location");
        Ok(self.coordinate)
    }
}
