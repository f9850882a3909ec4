//! Conversion from wire records into [`RawPlace`] values.

use medfind_core::{Category, Coordinate, RawPlace};

use crate::types::PlaceRecord;

/// Convert a parsed place record into a [`RawPlace`].
///
/// Returns `None` when the record has no identifier or no usable position;
/// such records cannot become facilities. When `origin_category` is set, its
/// tag is added so the hit stays classifiable by the sub-query that found it.
#[must_use]
pub fn to_raw_place(record: PlaceRecord, origin_category: Option<Category>) -> Option<RawPlace> {
    let external_id = record
        .place_id
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())?;
    let location = record.geometry?.location;
    let coordinate = Coordinate::new(location.lat, location.lng);
    if !coordinate.is_finite() {
        return None;
    }

    let mut place = RawPlace {
        external_id,
        name: record.name,
        coordinate,
        vicinity: record.vicinity,
        tags: record.types,
    };
    if let Some(category) = origin_category {
        if !place.has_tag(category.as_tag()) {
            place.tags.push(category.as_tag().to_owned());
        }
    }
    Some(place)
}

/// Parse every record in `results`, skipping malformed or unusable entries.
#[must_use]
pub fn parse_results(
    results: Vec<serde_json::Value>,
    origin_category: Option<Category>,
) -> Vec<RawPlace> {
    let total = results.len();
    let places: Vec<RawPlace> = results
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let record = serde_json::from_value::<PlaceRecord>(value)
                .map_err(|e| {
                    tracing::warn!(index = i, error = %e, "skipping malformed place record");
                })
                .ok()?;
            let place = to_raw_place(record, origin_category);
            if place.is_none() {
                tracing::warn!(index = i, "skipping place record without id or geometry");
            }
            place
        })
        .collect();
    tracing::debug!(total, kept = places.len(), "parsed place records");
    places
}
