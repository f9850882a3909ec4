//! Domain model and pure policies for nearby medical facility discovery.
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! reading the process environment in [`load_app_config`].

pub mod app_config;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod facility;
pub mod geo;
pub mod regions;
pub mod viewport_policy;

pub use app_config::{AppConfig, Environment, LocationPrecision, SearchMode};
pub use config::{
    load_app_config, load_app_config_from_env, DEFAULT_PLACES_BASE_URL, DEFAULT_USER_AGENT,
};
pub use dedupe::dedupe;
pub use error::ConfigError;
pub use facility::{
    classify, Category, Facility, FacilityKind, FacilitySet, RawPlace, UNNAMED_FACILITY,
    UNKNOWN_ADDRESS,
};
pub use geo::{Coordinate, Viewport};
pub use regions::{Anchor, SOUTH_AFRICA_ANCHORS};
pub use viewport_policy::{ViewportMovementPolicy, DEFAULT_REFETCH_THRESHOLD_DEGREES};
