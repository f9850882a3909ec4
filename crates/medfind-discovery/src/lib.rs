//! Facility discovery state machine and directions resolution.
//!
//! Device location, places search, and URL opening are reached only through
//! the [`GeolocationProvider`], [`medfind_places::PlacesSearch`] and
//! [`UrlOpener`] traits so hosts and tests can substitute their own.

pub mod controller;
pub mod directions;
pub mod geolocation;
pub mod state;

pub use controller::{DiscoveryConfig, FacilityDiscoveryController, SearchCompletion, SearchTicket};
pub use directions::{
    build_links, Advisory, DirectionsError, DirectionsLinks, DirectionsOutcome,
    DirectionsResolver, LinkError, Platform, UrlOpener,
};
pub use geolocation::{FixedLocation, GeolocationError, GeolocationProvider, PermissionStatus};
pub use state::{DiscoveryFailure, DiscoveryState, ErrorPresentation};
