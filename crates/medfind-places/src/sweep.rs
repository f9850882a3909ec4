//! Regional sweep: one search per anchor, deduplicated across all anchors.

use medfind_core::{dedupe, Anchor, Category, FacilitySet};

use crate::error::PlacesError;
use crate::search::PlacesSearch;

/// Search around every anchor in turn and merge the hits.
///
/// Anchors are visited sequentially; each anchor's search may itself issue
/// concurrent category sub-queries. The merged hits go through [`dedupe`]
/// once, so the first anchor to report a place decides its fields.
///
/// # Errors
///
/// Returns the first [`PlacesError`] raised by any anchor; partial results
/// are discarded.
pub async fn sweep<S>(
    search: &S,
    anchors: &[Anchor],
    radius_meters: u32,
    categories: &[Category],
) -> Result<FacilitySet, PlacesError>
where
    S: PlacesSearch + ?Sized,
{
    let mut raw = Vec::new();
    for anchor in anchors {
        let hits = search
            .search(anchor.coordinate, radius_meters, categories)
            .await
            .map_err(|e| {
                tracing::warn!(anchor = anchor.name, error = %e, "regional sweep aborted");
                e
            })?;
        tracing::debug!(anchor = anchor.name, hits = hits.len(), "anchor searched");
        raw.extend(hits);
    }

    let facilities = dedupe(&raw);
    tracing::info!(
        anchors = anchors.len(),
        hits = raw.len(),
        facilities = facilities.len(),
        "regional sweep complete"
    );
    Ok(facilities)
}
