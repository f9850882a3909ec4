use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use medfind_core::FacilityKind;

use super::*;
use crate::geolocation::GeolocationError;

const JOBURG: Coordinate = Coordinate::new(-26.20, 28.05);

struct FakeGeolocation {
    permission: Result<PermissionStatus, GeolocationError>,
    coordinate: Result<Coordinate, GeolocationError>,
}

impl FakeGeolocation {
    fn granted_at(coordinate: Coordinate) -> Self {
        Self {
            permission: Ok(PermissionStatus::Granted),
            coordinate: Ok(coordinate),
        }
    }
}

#[async_trait]
impl GeolocationProvider for FakeGeolocation {
    async fn request_permission(&self) -> Result<PermissionStatus, GeolocationError> {
        self.permission.clone()
    }

    async fn current_coordinate(
        &self,
        _precision: LocationPrecision,
    ) -> Result<Coordinate, GeolocationError> {
        self.coordinate.clone()
    }
}

type Reply = Result<Vec<RawPlace>, PlacesError>;

/// Replies from a script and records each call's origin plus the controller
/// state visible at the moment the search ran.
#[derive(Default)]
struct ScriptedSearch {
    replies: Mutex<VecDeque<Reply>>,
    origins: Mutex<Vec<Coordinate>>,
    observer: Mutex<Option<watch::Receiver<DiscoveryState>>>,
    observed: Mutex<Vec<DiscoveryState>>,
}

impl ScriptedSearch {
    fn with_replies(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    fn calls(&self) -> usize {
        self.origins.lock().unwrap().len()
    }
}

#[async_trait]
impl PlacesSearch for ScriptedSearch {
    async fn search(
        &self,
        origin: Coordinate,
        _radius_meters: u32,
        _categories: &[Category],
    ) -> Result<Vec<RawPlace>, PlacesError> {
        self.origins.lock().unwrap().push(origin);
        if let Some(rx) = self.observer.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(rx.borrow().clone());
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn hit(id: &str, tags: &[&str]) -> RawPlace {
    RawPlace {
        external_id: id.to_owned(),
        name: Some(format!("Facility {id}")),
        coordinate: Coordinate::new(-26.19, 28.04),
        vicinity: Some("Johannesburg".to_owned()),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
    }
}

fn upstream_error() -> PlacesError {
    PlacesError::Upstream {
        status: "UNKNOWN_ERROR".to_owned(),
        message: "server hiccup".to_owned(),
    }
}

fn viewport_at(latitude: f64, longitude: f64) -> Viewport {
    Viewport::new(Coordinate::new(latitude, longitude), 0.1, 0.1)
}

fn controller(
    geolocation: FakeGeolocation,
    search: &Arc<ScriptedSearch>,
) -> FacilityDiscoveryController<FakeGeolocation, ScriptedSearch> {
    FacilityDiscoveryController::new(geolocation, Arc::clone(search), DiscoveryConfig::default())
}

async fn ready_controller(
    search: &Arc<ScriptedSearch>,
) -> FacilityDiscoveryController<FakeGeolocation, ScriptedSearch> {
    let mut c = controller(FakeGeolocation::granted_at(JOBURG), search);
    c.mount().await;
    assert!(matches!(c.state(), DiscoveryState::Ready(_)));
    c
}

#[tokio::test]
async fn mount_passes_through_loading_before_ready() {
    let search = ScriptedSearch::with_replies(vec![Ok(vec![
        hit("h1", &["hospital"]),
        hit("h2", &["hospital"]),
        hit("h1", &["health"]),
    ])]);
    let mut c = controller(FakeGeolocation::granted_at(JOBURG), &search);
    *search.observer.lock().unwrap() = Some(c.subscribe());
    assert_eq!(*c.state(), DiscoveryState::Idle);

    c.mount().await;

    assert_eq!(*search.observed.lock().unwrap(), vec![DiscoveryState::Loading]);
    let DiscoveryState::Ready(set) = c.state() else {
        panic!("expected Ready, got {:?}", c.state());
    };
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("h1").unwrap().kind, FacilityKind::Hospital);
    assert_eq!(c.search_origin(), Some(JOBURG));
    assert_eq!(c.user_location(), Some(JOBURG));
    assert_eq!(*search.origins.lock().unwrap(), vec![JOBURG]);
    assert!(c.error_presentation().is_none());
}

#[tokio::test]
async fn denied_permission_is_terminal_without_searching() {
    let search = ScriptedSearch::with_replies(vec![]);
    let mut c = controller(
        FakeGeolocation {
            permission: Ok(PermissionStatus::Denied),
            coordinate: Ok(JOBURG),
        },
        &search,
    );

    c.mount().await;

    assert_eq!(*c.state(), DiscoveryState::PermissionDenied);
    assert_eq!(search.calls(), 0);
    assert_eq!(
        c.error_presentation(),
        Some(ErrorPresentation::Inline("Location permission not granted"))
    );
    assert!(!c.on_viewport_settled(viewport_at(-20.0, 20.0)).await);
    assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn permission_request_error_fails() {
    let search = ScriptedSearch::with_replies(vec![]);
    let mut c = controller(
        FakeGeolocation {
            permission: Err(GeolocationError::PermissionRequest("no prompt".into())),
            coordinate: Ok(JOBURG),
        },
        &search,
    );
    c.mount().await;
    assert!(matches!(
        c.state(),
        DiscoveryState::Failed(DiscoveryFailure::Permission(_))
    ));
}

#[tokio::test]
async fn location_failure_fails_after_loading() {
    let search = ScriptedSearch::with_replies(vec![]);
    let mut c = controller(
        FakeGeolocation {
            permission: Ok(PermissionStatus::Granted),
            coordinate: Err(GeolocationError::LocationUnavailable("no fix".into())),
        },
        &search,
    );
    let rx = c.subscribe();

    c.mount().await;

    assert!(matches!(
        c.state(),
        DiscoveryState::Failed(DiscoveryFailure::LocationUnavailable(_))
    ));
    assert_eq!(*rx.borrow(), *c.state());
    assert_eq!(search.calls(), 0);
    assert!(c.user_location().is_none());
    assert_eq!(
        c.error_presentation(),
        Some(ErrorPresentation::Inline("Unable to determine your location"))
    );
}

#[tokio::test]
async fn first_search_failure_has_no_data_and_is_inline() {
    let search = ScriptedSearch::with_replies(vec![Err(upstream_error())]);
    let mut c = controller(FakeGeolocation::granted_at(JOBURG), &search);

    c.mount().await;

    assert!(matches!(
        c.state(),
        DiscoveryState::Failed(DiscoveryFailure::Upstream(_))
    ));
    assert!(c.facilities().is_none());
    assert_eq!(
        c.error_presentation(),
        Some(ErrorPresentation::Inline("Error fetching medical facilities"))
    );
}

#[tokio::test]
async fn refetch_failure_while_ready_keeps_previous_set() {
    let search = ScriptedSearch::with_replies(vec![
        Ok(vec![hit("h1", &["hospital"])]),
        Err(upstream_error()),
    ]);
    let mut c = ready_controller(&search).await;
    let before = c.facilities().unwrap();

    assert!(c.on_viewport_settled(viewport_at(-25.70, 28.23)).await);

    assert!(matches!(c.state(), DiscoveryState::Failed(_)));
    let after = c.facilities().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(c.search_origin(), Some(JOBURG));
    assert_eq!(
        c.error_presentation(),
        Some(ErrorPresentation::Advisory("Error fetching medical facilities"))
    );
}

#[tokio::test]
async fn small_viewport_moves_do_not_refetch() {
    let search = ScriptedSearch::with_replies(vec![Ok(vec![hit("h1", &["hospital"])])]);
    let mut c = ready_controller(&search).await;

    assert!(!c.on_viewport_settled(viewport_at(-26.23, 28.08)).await);

    assert_eq!(search.calls(), 1);
    assert!(matches!(c.state(), DiscoveryState::Ready(_)));
    assert_eq!(c.viewport(), viewport_at(-26.23, 28.08));
}

#[tokio::test]
async fn large_viewport_move_refetches_at_new_center() {
    let search = ScriptedSearch::with_replies(vec![
        Ok(vec![hit("h1", &["hospital"])]),
        Ok(vec![hit("p1", &["hospital"]), hit("p2", &["health"])]),
    ]);
    let mut c = ready_controller(&search).await;
    let pretoria = Coordinate::new(-25.70, 28.23);

    assert!(c.on_viewport_settled(viewport_at(-25.70, 28.23)).await);

    assert_eq!(search.origins.lock().unwrap()[1], pretoria);
    assert_eq!(c.search_origin(), Some(pretoria));
    assert_eq!(c.user_location(), Some(JOBURG));
    let set = c.facilities().unwrap();
    assert_eq!(set.len(), 2);
    assert!(!set.contains("h1"), "sets are replaced, not merged");
}

#[tokio::test]
async fn viewport_in_failed_state_retries() {
    let search = ScriptedSearch::with_replies(vec![
        Err(upstream_error()),
        Ok(vec![hit("h1", &["hospital"])]),
    ]);
    let mut c = controller(FakeGeolocation::granted_at(JOBURG), &search);
    c.mount().await;
    assert!(matches!(c.state(), DiscoveryState::Failed(_)));

    // Even a tiny move retries after a failure.
    assert!(c.on_viewport_settled(viewport_at(-26.20, 28.05)).await);
    assert!(matches!(c.state(), DiscoveryState::Ready(_)));
}

#[tokio::test]
async fn viewport_after_permission_error_does_not_search() {
    let search = ScriptedSearch::with_replies(vec![Ok(vec![hit("h1", &["hospital"])])]);
    let mut c = controller(
        FakeGeolocation {
            permission: Err(GeolocationError::PermissionRequest("prompt crashed".into())),
            coordinate: Ok(JOBURG),
        },
        &search,
    );
    c.mount().await;
    assert!(matches!(c.state(), DiscoveryState::Failed(_)));

    assert!(!c.on_viewport_settled(Viewport::national_overview()).await);

    assert_eq!(search.calls(), 0);
    assert!(matches!(
        c.state(),
        DiscoveryState::Failed(DiscoveryFailure::Permission(_))
    ));
    assert!(c.facilities().is_none());
}

#[tokio::test]
async fn viewport_after_location_failure_does_not_search() {
    let search = ScriptedSearch::with_replies(vec![Ok(vec![hit("h1", &["hospital"])])]);
    let mut c = controller(
        FakeGeolocation {
            permission: Ok(PermissionStatus::Granted),
            coordinate: Err(GeolocationError::LocationUnavailable("no fix".into())),
        },
        &search,
    );
    c.mount().await;

    assert!(!c.on_viewport_settled(viewport_at(-25.70, 28.23)).await);

    assert_eq!(search.calls(), 0);
    assert!(matches!(
        c.state(),
        DiscoveryState::Failed(DiscoveryFailure::LocationUnavailable(_))
    ));
    assert_eq!(c.search_origin(), None);
}

#[tokio::test]
async fn viewport_is_ignored_before_mount_and_while_loading() {
    let search = ScriptedSearch::with_replies(vec![Ok(vec![hit("h1", &["hospital"])])]);
    let mut c = controller(FakeGeolocation::granted_at(JOBURG), &search);
    assert!(c.begin_viewport_search(viewport_at(0.0, 0.0)).is_none());

    c.mount().await;
    let ticket = c.begin_viewport_search(viewport_at(-25.0, 28.0)).unwrap();
    assert!(c.state().is_loading());
    assert!(
        c.begin_viewport_search(viewport_at(-24.0, 28.0)).is_none(),
        "no search may start on top of a loading one"
    );
    assert_eq!(c.generation(), ticket.generation);
}

#[tokio::test]
async fn mount_is_ignored_while_loading() {
    let search = ScriptedSearch::with_replies(vec![Ok(vec![hit("h1", &["hospital"])])]);
    let mut c = ready_controller(&search).await;
    let ticket = c.begin_viewport_search(viewport_at(-25.0, 28.0)).unwrap();

    c.mount().await;

    assert!(c.state().is_loading());
    assert_eq!(c.generation(), ticket.generation);
    assert_eq!(search.calls(), 1);
}

#[tokio::test]
async fn spawned_search_is_applied_when_current() {
    let search = ScriptedSearch::with_replies(vec![
        Ok(vec![hit("h1", &["hospital"])]),
        Ok(vec![hit("c9", &["health"])]),
    ]);
    let mut c = ready_controller(&search).await;
    let ticket = c.begin_viewport_search(viewport_at(-29.86, 31.02)).unwrap();

    let completion = c.spawn_search(ticket).await.unwrap();

    assert!(c.apply_completion(completion));
    assert_eq!(c.facilities().unwrap().get("c9").unwrap().kind, FacilityKind::Clinic);
}

#[tokio::test]
async fn completion_after_teardown_is_discarded() {
    let search = ScriptedSearch::with_replies(vec![
        Ok(vec![hit("h1", &["hospital"])]),
        Ok(vec![hit("late", &["hospital"])]),
    ]);
    let mut c = ready_controller(&search).await;
    let ticket = c.begin_viewport_search(viewport_at(-29.86, 31.02)).unwrap();
    let handle = c.spawn_search(ticket);

    c.teardown();
    let completion = handle.await.unwrap();

    assert!(!c.apply_completion(completion));
    assert!(!c.facilities().unwrap().contains("late"));
    assert!(c.begin_viewport_search(viewport_at(0.0, 0.0)).is_none());
}

#[tokio::test]
async fn completion_is_applied_only_once() {
    let search = ScriptedSearch::with_replies(vec![
        Ok(vec![hit("h1", &["hospital"])]),
        Ok(vec![hit("h2", &["hospital"])]),
    ]);
    let mut c = ready_controller(&search).await;
    let ticket = c.begin_viewport_search(viewport_at(-29.86, 31.02)).unwrap();
    let first = c.run_search(ticket).await;
    assert!(c.apply_completion(first));

    let replay = SearchCompletion {
        ticket,
        result: Err(upstream_error()),
    };
    assert!(!c.apply_completion(replay));
    assert!(matches!(c.state(), DiscoveryState::Ready(_)));
}

#[tokio::test]
async fn selection_follows_the_current_set() {
    let search = ScriptedSearch::with_replies(vec![
        Ok(vec![hit("h1", &["hospital"]), hit("h2", &["hospital"])]),
        Ok(vec![hit("h2", &["hospital"])]),
        Ok(vec![hit("h3", &["hospital"])]),
    ]);
    let mut c = ready_controller(&search).await;

    assert!(!c.select("missing"));
    assert!(c.selected().is_none());
    assert!(c.select("h2"));
    assert_eq!(c.selected().unwrap().id, "h2");

    c.on_viewport_settled(viewport_at(-25.0, 28.0)).await;
    assert_eq!(c.selected().unwrap().id, "h2", "kept while still present");

    c.on_viewport_settled(viewport_at(-24.0, 28.0)).await;
    assert!(c.selected().is_none(), "cleared once absent");

    assert!(c.select("h3"));
    c.dismiss_selection();
    assert!(c.selected().is_none());
}

#[tokio::test]
async fn remount_after_denial_recovers() {
    let search = ScriptedSearch::with_replies(vec![Ok(vec![hit("h1", &["hospital"])])]);
    let mut c = controller(
        FakeGeolocation {
            permission: Ok(PermissionStatus::Denied),
            coordinate: Ok(JOBURG),
        },
        &search,
    );
    c.mount().await;
    assert_eq!(*c.state(), DiscoveryState::PermissionDenied);

    c.geolocation.permission = Ok(PermissionStatus::Granted);
    c.mount().await;
    assert!(matches!(c.state(), DiscoveryState::Ready(_)));
}
