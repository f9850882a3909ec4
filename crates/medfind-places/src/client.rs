//! HTTP client for the nearby places search endpoint.
//!
//! Wraps `reqwest` with credential handling, category filters, and typed
//! response parsing. Every response's `"status"` field is checked and
//! non-success statuses surface as [`PlacesError::Upstream`].

use std::time::Duration;

use async_trait::async_trait;
use medfind_core::{AppConfig, Category, Coordinate, RawPlace, SearchMode};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::normalize::parse_results;
use crate::search::PlacesSearch;
use crate::types::NearbySearchResponse;

const NEARBY_SEARCH_PATH: &str = "nearbysearch/json";

/// Query parameters selecting one slice of the category space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CategoryFilter {
    place_type: &'static str,
    keyword: Option<&'static str>,
}

impl CategoryFilter {
    fn for_category(category: Category) -> Self {
        match category {
            Category::Hospital => Self {
                place_type: "hospital",
                keyword: None,
            },
            Category::Health => Self {
                place_type: "health",
                keyword: Some("clinic"),
            },
        }
    }

    /// One filter covering every category in `categories` (sorted, deduped).
    fn combined(categories: &[Category]) -> Self {
        match categories {
            [single] => Self::for_category(*single),
            _ => Self {
                place_type: "health",
                keyword: Some("hospital|clinic"),
            },
        }
    }
}

/// Client for the nearby places search service.
///
/// Use [`PlacesClient::from_config`] for production or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    mode: SearchMode,
}

impl PlacesClient {
    /// Creates a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            &config.places_api_key,
            config.request_timeout_secs,
            &config.user_agent,
            config.search_mode,
            &config.places_base_url,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        mode: SearchMode,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends the endpoint path
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            mode,
        })
    }

    /// Runs one nearby-search request for a single category filter.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Upstream`] if the service returns a failure status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the envelope has an unexpected shape.
    async fn nearby(
        &self,
        origin: Coordinate,
        radius_meters: u32,
        filter: CategoryFilter,
        origin_category: Option<Category>,
    ) -> Result<Vec<RawPlace>, PlacesError> {
        let url = self.build_url(origin, radius_meters, filter)?;
        tracing::debug!(
            %origin,
            radius_meters,
            place_type = filter.place_type,
            keyword = filter.keyword,
            "issuing nearby search"
        );
        let body = self.request_json(&url).await?;
        Self::check_api_error(&body)?;

        let envelope: NearbySearchResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("nearbysearch(type={})", filter.place_type),
                source: e,
            })?;

        Ok(parse_results(envelope.results, origin_category))
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(
        &self,
        origin: Coordinate,
        radius_meters: u32,
        filter: CategoryFilter,
    ) -> Result<Url, PlacesError> {
        let mut url =
            self.base_url
                .join(NEARBY_SEARCH_PATH)
                .map_err(|e| PlacesError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("location", &origin.to_string());
            pairs.append_pair("radius", &radius_meters.to_string());
            pairs.append_pair("type", filter.place_type);
            if let Some(keyword) = filter.keyword {
                pairs.append_pair("keyword", keyword);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: redact_key(url),
            source: e,
        })
    }

    /// `OK` and `ZERO_RESULTS` are success; anything else is an upstream error.
    fn check_api_error(body: &serde_json::Value) -> Result<(), PlacesError> {
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("MISSING_STATUS");
        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            other => {
                let message = body
                    .get("error_message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("no error message")
                    .to_string();
                Err(PlacesError::Upstream {
                    status: other.to_string(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl PlacesSearch for PlacesClient {
    async fn search(
        &self,
        origin: Coordinate,
        radius_meters: u32,
        categories: &[Category],
    ) -> Result<Vec<RawPlace>, PlacesError> {
        let mut categories = categories.to_vec();
        categories.sort_unstable();
        categories.dedup();
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let places: Vec<RawPlace> = match self.mode {
            SearchMode::Combined => {
                self.nearby(
                    origin,
                    radius_meters,
                    CategoryFilter::combined(&categories),
                    None,
                )
                .await?
            }
            SearchMode::Split => {
                let queries = categories.iter().map(|&category| {
                    self.nearby(
                        origin,
                        radius_meters,
                        CategoryFilter::for_category(category),
                        Some(category),
                    )
                });
                // try_join_all keeps input order, so hospital hits lead.
                futures::future::try_join_all(queries)
                    .await?
                    .into_iter()
                    .flatten()
                    .collect()
            }
        };

        tracing::info!(
            %origin,
            radius_meters,
            mode = %self.mode,
            hits = places.len(),
            "nearby search complete"
        );
        Ok(places)
    }
}

fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "[redacted]".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
