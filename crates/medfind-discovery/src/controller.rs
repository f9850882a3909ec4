//! Orchestrates permission, positioning, search and dedup into the
//! observable [`DiscoveryState`] machine.
//!
//! ```text
//! Idle --mount--> permission --denied--> PermissionDenied
//!                     | granted
//!                     v
//!                  Loading --ok--> Ready(set) --viewport moved--> Loading
//!                     | err
//!                     v
//!                  Failed(reason), previous set kept for display
//! ```
//!
//! Every search carries the generation it was started under. A completion is
//! applied only if its generation is still current and the controller has
//! not been torn down, so a late result never lands on a discarded view.

use std::sync::Arc;

use medfind_core::{
    dedupe, AppConfig, Category, Coordinate, Facility, FacilitySet, LocationPrecision, RawPlace,
    Viewport, ViewportMovementPolicy,
};
use medfind_places::{PlacesError, PlacesSearch};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::geolocation::{GeolocationProvider, PermissionStatus};
use crate::state::{DiscoveryFailure, DiscoveryState, ErrorPresentation};

/// Search parameters fixed for the lifetime of a controller.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub search_radius_meters: u32,
    pub categories: Vec<Category>,
    pub precision: LocationPrecision,
    pub policy: ViewportMovementPolicy,
    pub initial_viewport: Viewport,
}

impl DiscoveryConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_radius_meters: config.search_radius_meters,
            precision: config.location_precision,
            policy: ViewportMovementPolicy::new(config.refetch_threshold_degrees),
            ..Self::default()
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: 10_000,
            categories: Category::ALL.to_vec(),
            precision: LocationPrecision::default(),
            policy: ViewportMovementPolicy::default(),
            initial_viewport: Viewport::national_overview(),
        }
    }
}

/// Permission to run one search, handed out when the controller enters
/// `Loading`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTicket {
    pub generation: u64,
    pub origin: Coordinate,
}

/// The outcome of a search, to be fed back through
/// [`FacilityDiscoveryController::apply_completion`].
#[derive(Debug)]
pub struct SearchCompletion {
    pub ticket: SearchTicket,
    pub result: Result<Vec<RawPlace>, PlacesError>,
}

pub struct FacilityDiscoveryController<G, P: ?Sized> {
    geolocation: G,
    places: Arc<P>,
    config: DiscoveryConfig,
    state: DiscoveryState,
    /// Last successfully fetched set; survives later failures.
    facilities: Option<Arc<FacilitySet>>,
    search_origin: Option<Coordinate>,
    user_location: Option<Coordinate>,
    viewport: Viewport,
    selected: Option<String>,
    generation: u64,
    torn_down: bool,
    updates: watch::Sender<DiscoveryState>,
}

impl<G, P> FacilityDiscoveryController<G, P>
where
    G: GeolocationProvider,
    P: PlacesSearch + ?Sized,
{
    pub fn new(geolocation: G, places: Arc<P>, config: DiscoveryConfig) -> Self {
        let (updates, _) = watch::channel(DiscoveryState::Idle);
        let viewport = config.initial_viewport;
        Self {
            geolocation,
            places,
            config,
            state: DiscoveryState::Idle,
            facilities: None,
            search_origin: None,
            user_location: None,
            viewport,
            selected: None,
            generation: 0,
            torn_down: false,
            updates,
        }
    }

    #[must_use]
    pub fn state(&self) -> &DiscoveryState {
        &self.state
    }

    /// Receives every state the controller enters, latest value wins.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DiscoveryState> {
        self.updates.subscribe()
    }

    /// The set currently on display, retained across failed refetches.
    #[must_use]
    pub fn facilities(&self) -> Option<Arc<FacilitySet>> {
        self.facilities.clone()
    }

    #[must_use]
    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    #[must_use]
    pub fn search_origin(&self) -> Option<Coordinate> {
        self.search_origin
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn error_presentation(&self) -> Option<ErrorPresentation> {
        ErrorPresentation::for_state(&self.state, self.facilities.is_some())
    }

    /// Request permission, locate the user and run the first search.
    ///
    /// Also the recovery path after `PermissionDenied` or `Failed`. Ignored
    /// while a search is loading or after [`Self::teardown`].
    pub async fn mount(&mut self) -> &DiscoveryState {
        if self.torn_down || self.state.is_loading() {
            tracing::debug!(state = self.state.name(), "mount ignored");
            return &self.state;
        }

        let permission = self.geolocation.request_permission().await;
        match permission {
            Ok(PermissionStatus::Granted) => {}
            Ok(PermissionStatus::Denied) => {
                tracing::warn!("location permission denied");
                self.transition(DiscoveryState::PermissionDenied);
                return &self.state;
            }
            Err(e) => {
                self.fail(DiscoveryFailure::from(&e));
                return &self.state;
            }
        }

        let generation = self.enter_loading();
        let located = self
            .geolocation
            .current_coordinate(self.config.precision)
            .await;
        let origin = match located {
            Ok(coordinate) => coordinate,
            Err(e) => {
                if self.is_current(generation) {
                    self.fail(DiscoveryFailure::from(&e));
                }
                return &self.state;
            }
        };
        self.user_location = Some(origin);

        let ticket = SearchTicket { generation, origin };
        let completion = self.run_search(ticket).await;
        self.apply_completion(completion);
        &self.state
    }

    /// Handle a settled viewport, refetching inline when warranted.
    ///
    /// Returns `true` if a search was run.
    pub async fn on_viewport_settled(&mut self, viewport: Viewport) -> bool {
        let Some(ticket) = self.begin_viewport_search(viewport) else {
            return false;
        };
        let completion = self.run_search(ticket).await;
        self.apply_completion(completion);
        true
    }

    /// Record a settled viewport and, if it warrants a refetch, enter
    /// `Loading` and return the ticket for the search.
    ///
    /// From `Ready` the movement policy decides; from `Failed` any settled
    /// viewport retries at its centre, provided the user was located. Other
    /// states never start a search.
    pub fn begin_viewport_search(&mut self, viewport: Viewport) -> Option<SearchTicket> {
        self.viewport = viewport;
        if self.torn_down {
            return None;
        }
        let center = viewport.center;
        let warranted = match &self.state {
            DiscoveryState::Ready(_) => self
                .search_origin
                .is_none_or(|origin| self.config.policy.should_refetch(origin, center)),
            // Only retry once the user has been located; a failed
            // permission prompt or position fix never grants a search.
            DiscoveryState::Failed(_) => self.user_location.is_some(),
            DiscoveryState::Idle | DiscoveryState::Loading | DiscoveryState::PermissionDenied => {
                false
            }
        };
        if !warranted {
            tracing::trace!(%center, state = self.state.name(), "viewport change ignored");
            return None;
        }
        tracing::debug!(%center, "viewport moved; refetching");
        let generation = self.enter_loading();
        Some(SearchTicket {
            generation,
            origin: center,
        })
    }

    /// Run the search for `ticket` without touching controller state.
    pub async fn run_search(&self, ticket: SearchTicket) -> SearchCompletion {
        let result = self
            .places
            .search(
                ticket.origin,
                self.config.search_radius_meters,
                &self.config.categories,
            )
            .await;
        SearchCompletion { ticket, result }
    }

    /// Apply a finished search. Returns `false` if it was stale and dropped.
    ///
    /// Only the search that put the controller into its current `Loading`
    /// state is applied, and only once.
    pub fn apply_completion(&mut self, completion: SearchCompletion) -> bool {
        let SearchCompletion { ticket, result } = completion;
        if !self.is_current(ticket.generation) || !self.state.is_loading() {
            tracing::debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                torn_down = self.torn_down,
                state = self.state.name(),
                "discarding stale search result"
            );
            return false;
        }

        match result {
            Ok(raw) => {
                let set = Arc::new(dedupe(&raw));
                tracing::info!(
                    origin = %ticket.origin,
                    facilities = set.len(),
                    "facility search applied"
                );
                if let Some(id) = &self.selected {
                    if !set.contains(id) {
                        tracing::debug!(id = %id, "selection cleared; facility no longer present");
                        self.selected = None;
                    }
                }
                self.facilities = Some(Arc::clone(&set));
                self.search_origin = Some(ticket.origin);
                self.transition(DiscoveryState::Ready(set));
            }
            Err(e) => {
                tracing::warn!(origin = %ticket.origin, error = %e, "facility search failed");
                self.fail(DiscoveryFailure::from(&e));
            }
        }
        true
    }

    /// Select a facility from the current set. Unknown ids are rejected.
    pub fn select(&mut self, id: &str) -> bool {
        let known = self.facilities.as_ref().is_some_and(|set| set.contains(id));
        if known {
            self.selected = Some(id.to_owned());
        }
        known
    }

    pub fn dismiss_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Facility> {
        let id = self.selected.as_deref()?;
        self.facilities.as_ref()?.get(id)
    }

    /// Detach the controller from its view. Outstanding searches are
    /// discarded when they complete and no new ones start.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.generation += 1;
        tracing::debug!(generation = self.generation, "controller torn down");
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.torn_down && generation == self.generation
    }

    fn enter_loading(&mut self) -> u64 {
        self.generation += 1;
        self.transition(DiscoveryState::Loading);
        self.generation
    }

    fn fail(&mut self, failure: DiscoveryFailure) {
        tracing::warn!(%failure, retained = self.facilities.is_some(), "discovery failed");
        self.transition(DiscoveryState::Failed(failure));
    }

    fn transition(&mut self, next: DiscoveryState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "discovery state");
        self.state = next;
        self.updates.send_replace(self.state.clone());
    }
}

impl<G, P> FacilityDiscoveryController<G, P>
where
    G: GeolocationProvider,
    P: PlacesSearch + ?Sized + 'static,
{
    /// Run the search for `ticket` on the tokio runtime.
    ///
    /// The host applies the returned completion with
    /// [`Self::apply_completion`] whenever it arrives.
    #[must_use]
    pub fn spawn_search(&self, ticket: SearchTicket) -> JoinHandle<SearchCompletion> {
        let places = Arc::clone(&self.places);
        let radius_meters = self.config.search_radius_meters;
        let categories = self.config.categories.clone();
        tokio::spawn(async move {
            let result = places
                .search(ticket.origin, radius_meters, &categories)
                .await;
            SearchCompletion { ticket, result }
        })
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
