use std::sync::Arc;

use async_trait::async_trait;
use medfind_core::{Category, Coordinate, RawPlace};

use crate::error::PlacesError;

/// A single remote query for facilities near a coordinate.
///
/// Implementations combine results from all requested categories into one
/// sequence, hospital hits first, without deduplicating them.
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    async fn search(
        &self,
        origin: Coordinate,
        radius_meters: u32,
        categories: &[Category],
    ) -> Result<Vec<RawPlace>, PlacesError>;
}

#[async_trait]
impl<T: PlacesSearch + ?Sized> PlacesSearch for Arc<T> {
    async fn search(
        &self,
        origin: Coordinate,
        radius_meters: u32,
        categories: &[Category],
    ) -> Result<Vec<RawPlace>, PlacesError> {
        (**self).search(origin, radius_meters, categories).await
    }
}
