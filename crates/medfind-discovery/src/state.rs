//! Observable discovery states.

use std::sync::Arc;

use medfind_core::FacilitySet;
use medfind_places::PlacesError;

use crate::geolocation::GeolocationError;

const PERMISSION_DENIED_MESSAGE: &str = "Location permission not granted";
const LOCATION_FAILED_MESSAGE: &str = "Unable to determine your location";
const SEARCH_FAILED_MESSAGE: &str = "Error fetching medical facilities";

/// Why a discovery attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryFailure {
    /// The permission prompt errored (distinct from the user declining).
    Permission(String),
    LocationUnavailable(String),
    /// The search request never reached the service.
    Network(String),
    /// The service answered with an error or malformed data.
    Upstream(String),
}

impl DiscoveryFailure {
    /// Short message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            DiscoveryFailure::Permission(_) | DiscoveryFailure::LocationUnavailable(_) => {
                LOCATION_FAILED_MESSAGE
            }
            DiscoveryFailure::Network(_) | DiscoveryFailure::Upstream(_) => SEARCH_FAILED_MESSAGE,
        }
    }
}

impl std::fmt::Display for DiscoveryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryFailure::Permission(reason) => write!(f, "permission error: {reason}"),
            DiscoveryFailure::LocationUnavailable(reason) => {
                write!(f, "location unavailable: {reason}")
            }
            DiscoveryFailure::Network(reason) => write!(f, "network error: {reason}"),
            DiscoveryFailure::Upstream(reason) => write!(f, "upstream error: {reason}"),
        }
    }
}

impl From<&GeolocationError> for DiscoveryFailure {
    fn from(err: &GeolocationError) -> Self {
        match err {
            GeolocationError::PermissionRequest(reason) => {
                DiscoveryFailure::Permission(reason.clone())
            }
            GeolocationError::LocationUnavailable(reason) => {
                DiscoveryFailure::LocationUnavailable(reason.clone())
            }
        }
    }
}

impl From<&PlacesError> for DiscoveryFailure {
    fn from(err: &PlacesError) -> Self {
        if err.is_network() {
            DiscoveryFailure::Network(err.to_string())
        } else {
            DiscoveryFailure::Upstream(err.to_string())
        }
    }
}

/// Exactly one of these is active on a controller at any time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DiscoveryState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<FacilitySet>),
    PermissionDenied,
    Failed(DiscoveryFailure),
}

impl DiscoveryState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, DiscoveryState::Loading)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DiscoveryState::Idle => "idle",
            DiscoveryState::Loading => "loading",
            DiscoveryState::Ready(_) => "ready",
            DiscoveryState::PermissionDenied => "permission_denied",
            DiscoveryState::Failed(_) => "failed",
        }
    }
}

/// How a surrounding screen should surface the current error, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Nothing has been shown yet; the error replaces the content.
    Inline(&'static str),
    /// Earlier results stay on screen; the error is a non-blocking notice.
    Advisory(&'static str),
}

impl ErrorPresentation {
    pub(crate) fn for_state(state: &DiscoveryState, has_prior_data: bool) -> Option<Self> {
        let message = match state {
            DiscoveryState::PermissionDenied => PERMISSION_DENIED_MESSAGE,
            DiscoveryState::Failed(failure) => failure.user_message(),
            DiscoveryState::Idle | DiscoveryState::Loading | DiscoveryState::Ready(_) => {
                return None
            }
        };
        Some(if has_prior_data {
            ErrorPresentation::Advisory(message)
        } else {
            ErrorPresentation::Inline(message)
        })
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ErrorPresentation::Inline(m) | ErrorPresentation::Advisory(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geolocation_errors_map_to_location_failures() {
        let f = DiscoveryFailure::from(&GeolocationError::LocationUnavailable("gps".into()));
        assert_eq!(f, DiscoveryFailure::LocationUnavailable("gps".into()));
        assert_eq!(f.user_message(), LOCATION_FAILED_MESSAGE);
    }

    #[test]
    fn upstream_places_error_maps_to_upstream_failure() {
        let err = PlacesError::Upstream {
            status: "INVALID_REQUEST".into(),
            message: "bad".into(),
        };
        let f = DiscoveryFailure::from(&err);
        assert!(matches!(f, DiscoveryFailure::Upstream(_)));
        assert_eq!(f.user_message(), SEARCH_FAILED_MESSAGE);
    }

    #[test]
    fn presentation_depends_on_prior_data() {
        let failed = DiscoveryState::Failed(DiscoveryFailure::Network("down".into()));
        assert_eq!(
            ErrorPresentation::for_state(&failed, false),
            Some(ErrorPresentation::Inline(SEARCH_FAILED_MESSAGE))
        );
        assert_eq!(
            ErrorPresentation::for_state(&failed, true),
            Some(ErrorPresentation::Advisory(SEARCH_FAILED_MESSAGE))
        );
        assert_eq!(ErrorPresentation::for_state(&DiscoveryState::Loading, true), None);
    }

    #[test]
    fn permission_denied_presents_original_message() {
        let p = ErrorPresentation::for_state(&DiscoveryState::PermissionDenied, false).unwrap();
        assert_eq!(p.message(), "Location permission not granted");
    }
}
