//! Facility types produced from raw places-search hits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::geo::Coordinate;

/// Display name used when a place carries no usable name.
pub const UNNAMED_FACILITY: &str = "Unnamed Facility";
/// Address used when a place carries no usable vicinity text.
pub const UNKNOWN_ADDRESS: &str = "Address not available";

const HOSPITAL_TAG: &str = "hospital";
const HEALTH_TAG: &str = "health";

/// A category filter understood by the places search service.
///
/// Ordered so that `Hospital` sorts first; search results are combined in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hospital,
    Health,
}

impl Category {
    /// Every category a facility search covers by default.
    pub const ALL: [Category; 2] = [Category::Hospital, Category::Health];

    /// The tag string the upstream service uses for this category.
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Category::Hospital => HOSPITAL_TAG,
            Category::Health => HEALTH_TAG,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A single search hit as returned by the places service, before dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    /// Opaque, stable identifier assigned by the places service.
    pub external_id: String,
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub vicinity: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RawPlace {
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Hospital,
    Clinic,
}

impl std::fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacilityKind::Hospital => write!(f, "hospital"),
            FacilityKind::Clinic => write!(f, "clinic"),
        }
    }
}

/// Resolve a facility kind from a place's tag set.
///
/// Any `hospital` tag wins; everything else is a clinic.
#[must_use]
pub fn classify<S: AsRef<str>>(tags: &[S]) -> FacilityKind {
    if tags
        .iter()
        .any(|t| t.as_ref().eq_ignore_ascii_case(HOSPITAL_TAG))
    {
        FacilityKind::Hospital
    } else {
        FacilityKind::Clinic
    }
}

/// A deduplicated, normalised hospital or clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub address: String,
    pub kind: FacilityKind,
}

impl Facility {
    /// Normalise a raw hit, substituting sentinels for blank name/address.
    #[must_use]
    pub fn from_raw(raw: &RawPlace) -> Self {
        Self {
            id: raw.external_id.clone(),
            name: non_blank(raw.name.as_deref()).unwrap_or(UNNAMED_FACILITY).to_owned(),
            coordinate: raw.coordinate,
            address: non_blank(raw.vicinity.as_deref())
                .unwrap_or(UNKNOWN_ADDRESS)
                .to_owned(),
            kind: classify(&raw.tags),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Facilities keyed by id. No two members share an id.
///
/// Built only through [`crate::dedupe`]; never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilitySet {
    facilities: Vec<Facility>,
    index: HashMap<String, usize>,
}

impl FacilitySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Facility> {
        self.index.get(id).map(|&i| &self.facilities[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Facility> {
        self.facilities.iter()
    }

    #[must_use]
    pub fn count_of(&self, kind: FacilityKind) -> usize {
        self.facilities.iter().filter(|f| f.kind == kind).count()
    }

    /// Insert unless the id is already present. Returns whether it was added.
    pub(crate) fn insert_if_absent(&mut self, facility: Facility) -> bool {
        if self.index.contains_key(&facility.id) {
            return false;
        }
        self.index
            .insert(facility.id.clone(), self.facilities.len());
        self.facilities.push(facility);
        true
    }
}

impl<'a> IntoIterator for &'a FacilitySet {
    type Item = &'a Facility;
    type IntoIter = std::slice::Iter<'a, Facility>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FacilitySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.facilities)
    }
}
