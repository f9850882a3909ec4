use thiserror::Error;

/// Errors returned by the places search client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Transport failure or non-2xx HTTP status from the underlying client.
    ///
    /// The request URL carries the API key, so it is stripped on conversion.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The service answered with a status other than `OK`/`ZERO_RESULTS`.
    #[error("places API error ({status}): {message}")]
    Upstream { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        PlacesError::Http(e.without_url())
    }
}

impl PlacesError {
    /// `true` when the request never produced an HTTP response (DNS, connect,
    /// timeout). Everything else means the service answered badly.
    #[must_use]
    pub fn is_network(&self) -> bool {
        match self {
            PlacesError::Http(e) => e.status().is_none() && !e.is_decode() && !e.is_builder(),
            PlacesError::Upstream { .. }
            | PlacesError::Deserialize { .. }
            | PlacesError::InvalidBaseUrl { .. } => false,
        }
    }
}
