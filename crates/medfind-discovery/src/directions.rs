//! Turn-by-turn directions hand-off to the host's map application.
//!
//! Resolution order: ask the host whether the native map URI can be opened,
//! open it if so, and fall back to the universal web link when the answer is
//! no, the probe errors, or the native open itself fails.

use async_trait::async_trait;
use medfind_core::{Coordinate, Facility};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const WEB_DIRECTIONS_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

const NO_LOCATION_ADVISORY: Advisory = Advisory {
    title: "Location Required",
    message: "Please enable location services to get directions.",
};

/// Mobile platform family; selects the native deep-link scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsLinks {
    /// Deep link addressed to the native map handler.
    pub native: String,
    /// Browser link usable anywhere.
    pub web: String,
}

/// Build the native and web directions URIs for `facility`.
#[must_use]
pub fn build_links(platform: Platform, facility: &Facility) -> DirectionsLinks {
    let destination = facility.coordinate.to_string();
    let label = utf8_percent_encode(&facility.name, URI_COMPONENT).to_string();
    let native = match platform {
        Platform::Ios => {
            format!("comgooglemaps://?q={label}@{destination}&directionsmode=driving")
        }
        Platform::Android => format!("geo:0,0?q={destination}({label})"),
    };
    DirectionsLinks {
        native,
        web: format!("{WEB_DIRECTIONS_BASE}{destination}"),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("link handler error: {0}")]
    Handler(String),
}

/// Host capability for probing and opening URIs.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn can_open(&self, url: &str) -> Result<bool, LinkError>;

    async fn open(&self, url: &str) -> Result<(), LinkError>;
}

/// A user-facing notice that replaces the action without failing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionsOutcome {
    OpenedNative(String),
    OpenedWeb(String),
    /// Nothing was opened; the advisory should be shown instead.
    Advised(Advisory),
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("could not open web directions {url}: {source}")]
    WebFallback {
        url: String,
        #[source]
        source: LinkError,
    },
}

pub struct DirectionsResolver<O> {
    opener: O,
    platform: Platform,
}

impl<O: UrlOpener> DirectionsResolver<O> {
    pub fn new(opener: O, platform: Platform) -> Self {
        Self { opener, platform }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Open directions to `facility` from the user's last known position.
    ///
    /// Without a known position nothing is opened and the location advisory
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::WebFallback`] only when the web link, the
    /// last resort, cannot be opened.
    pub async fn open_directions(
        &self,
        facility: &Facility,
        user_location: Option<Coordinate>,
    ) -> Result<DirectionsOutcome, DirectionsError> {
        let Some(origin) = user_location else {
            tracing::warn!(facility = %facility.id, "directions requested without a user location");
            return Ok(DirectionsOutcome::Advised(NO_LOCATION_ADVISORY));
        };

        let links = build_links(self.platform, facility);
        tracing::debug!(
            facility = %facility.id,
            %origin,
            platform = ?self.platform,
            native = %links.native,
            "resolving directions"
        );

        match self.opener.can_open(&links.native).await {
            Ok(true) => match self.opener.open(&links.native).await {
                Ok(()) => return Ok(DirectionsOutcome::OpenedNative(links.native)),
                Err(e) => {
                    tracing::warn!(error = %e, "native directions failed to open; using web");
                }
            },
            Ok(false) => {
                tracing::debug!("no native handler for directions; using web");
            }
            Err(e) => {
                tracing::warn!(error = %e, "directions capability probe failed; using web");
            }
        }

        self.opener
            .open(&links.web)
            .await
            .map_err(|source| DirectionsError::WebFallback {
                url: links.web.clone(),
                source,
            })?;
        Ok(DirectionsOutcome::OpenedWeb(links.web))
    }
}
