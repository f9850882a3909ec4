//! First-write-wins merge of raw search hits into a [`FacilitySet`].

use crate::facility::{Facility, FacilitySet, RawPlace};

/// Merge raw hits into a unique facility set.
///
/// Hits are taken in arrival order. The first occurrence of an external id
/// becomes the facility; later occurrences are dropped even when their
/// fields differ. Callers that need hospital precedence place hospital hits
/// ahead of clinic hits.
#[must_use]
pub fn dedupe<'a, I>(raw: I) -> FacilitySet
where
    I: IntoIterator<Item = &'a RawPlace>,
{
    let mut set = FacilitySet::new();
    let mut dropped = 0usize;
    for place in raw {
        if set.contains(&place.external_id) {
            dropped += 1;
            continue;
        }
        set.insert_if_absent(Facility::from_raw(place));
    }
    tracing::debug!(unique = set.len(), dropped, "deduplicated search hits");
    set
}
