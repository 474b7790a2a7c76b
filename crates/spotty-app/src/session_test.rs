use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use spotty_core::{FacilityId, NewFacility};
use tokio::sync::oneshot;
use tokio::task::LocalSet;

use super::*;
use crate::location::ConfiguredPosition;
use crate::{LocationError, SubmissionState};

enum Reply {
    Now(Result<Facility, RepositoryError>),
    Gated(oneshot::Receiver<Result<Facility, RepositoryError>>),
}

/// In-memory repository that records every call.
#[derive(Default)]
struct FakeRepo {
    nearby: RefCell<VecDeque<Result<Vec<Facility>, RepositoryError>>>,
    replies: RefCell<VecDeque<Reply>>,
    fetch_calls: RefCell<Vec<(Coordinate, f64)>>,
    create_calls: RefCell<Vec<NewFacility>>,
}

impl FakeRepo {
    fn with_nearby(result: Result<Vec<Facility>, RepositoryError>) -> Rc<Self> {
        let repo = Self::default();
        repo.nearby.borrow_mut().push_back(result);
        Rc::new(repo)
    }

    fn reply(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(reply);
    }
}

impl FacilityRepository for FakeRepo {
    async fn fetch_near(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Facility>, RepositoryError> {
        self.fetch_calls.borrow_mut().push((center, radius_km));
        self.nearby
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create(&self, facility: &NewFacility) -> Result<Facility, RepositoryError> {
        self.create_calls.borrow_mut().push(facility.clone());
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .expect("unexpected create call");
        match reply {
            Reply::Now(result) => result,
            Reply::Gated(rx) => rx.await.expect("gate dropped"),
        }
    }
}

/// Position source that waits until the test releases it.
struct GatedPosition(RefCell<Option<oneshot::Receiver<Coordinate>>>);

impl PositionSource for GatedPosition {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let rx = self.0.borrow_mut().take().ok_or(LocationError::Unavailable)?;
        rx.await.map_err(|_| LocationError::Failed("gate dropped".to_owned()))
    }
}

fn at(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

fn minneapolis() -> Coordinate {
    at(44.9778, -93.265)
}

fn facility(id: &str, name: &str, location: Coordinate) -> Facility {
    Facility {
        id: FacilityId::new(id),
        name: name.to_owned(),
        location,
        is_free: true,
        running_water: Some(true),
        open_in_winter: Some(false),
        gender_neutral: Some(true),
        wheelchair: None,
        indoor: None,
        baby_change: None,
        menstrual_products: None,
        average_cleanliness: Some(4.2),
        rating_count: 0,
    }
}

fn device(position: Coordinate) -> LocationProvider<ConfiguredPosition> {
    LocationProvider::new(
        ConfiguredPosition::new(Some(position)),
        minneapolis(),
        Duration::from_secs(1),
    )
}

fn no_device() -> LocationProvider<ConfiguredPosition> {
    LocationProvider::new(
        ConfiguredPosition::new(None),
        minneapolis(),
        Duration::from_secs(1),
    )
}

async fn started_session(repo: &Rc<FakeRepo>) -> Session<FakeRepo> {
    let mut session = Session::new(Rc::clone(repo), 3.0);
    session.start(device(minneapolis()));
    session.settle().await;
    session
}

#[tokio::test]
async fn denied_location_falls_back_and_fetches_once() {
    LocalSet::new()
        .run_until(async {
            let repo = FakeRepo::with_nearby(Ok(Vec::new()));
            let mut session = Session::new(Rc::clone(&repo), 3.0);
            session.start(no_device());
            session.start(device(at(1.0, 1.0)));
            session.settle().await;

            let view = session.view();
            assert_eq!(view.location, LocationState::FallbackResolved(minneapolis()));
            assert_eq!(view.viewport.center(), Some(minneapolis()));
            assert!(matches!(view.error, Some(AppError::LocationUnavailable(_))));
            assert_eq!(*repo.fetch_calls.borrow(), vec![(minneapolis(), 3.0)]);
        })
        .await;
}

#[tokio::test]
async fn fetch_waits_for_location() {
    LocalSet::new()
        .run_until(async {
            let repo = FakeRepo::with_nearby(Ok(Vec::new()));
            let (release, gate) = oneshot::channel();
            let provider = LocationProvider::new(
                GatedPosition(RefCell::new(Some(gate))),
                minneapolis(),
                Duration::from_secs(5),
            );

            let mut session = Session::new(Rc::clone(&repo), 3.0);
            session.start(provider);
            tokio::task::yield_now().await;
            assert_eq!(session.view().location, LocationState::Resolving);
            assert!(repo.fetch_calls.borrow().is_empty());

            release.send(at(45.0, -93.0)).unwrap();
            session.settle().await;

            assert_eq!(session.view().location, LocationState::Resolved(at(45.0, -93.0)));
            assert_eq!(*repo.fetch_calls.borrow(), vec![(at(45.0, -93.0), 3.0)]);
            assert!(session.view().error.is_none());
        })
        .await;
}

#[tokio::test]
async fn fetch_failure_keeps_empty_dataset_and_surfaces_error() {
    LocalSet::new()
        .run_until(async {
            let repo = FakeRepo::with_nearby(Err(RepositoryError::from_status(500, "")));
            let session = started_session(&repo).await;

            let view = session.view();
            assert!(view.dataset.is_empty());
            assert_eq!(
                view.error,
                Some(&AppError::FetchFailed(
                    "request failed with status 500".to_owned()
                ))
            );
            assert_eq!(view.mode, &Mode::Browsing);
        })
        .await;
}

#[tokio::test]
async fn last_click_wins() {
    LocalSet::new()
        .run_until(async {
            let repo = FakeRepo::with_nearby(Ok(Vec::new()));
            let mut session = started_session(&repo).await;

            session.dispatch(UiEvent::MapClicked(at(1.0, 1.0)));
            session.dispatch(UiEvent::MapClicked(at(2.0, 2.0)));

            let pending = session.controller().pending().expect("editing");
            assert_eq!(pending.location(), at(2.0, 2.0));
        })
        .await;
}

#[tokio::test]
async fn blank_name_submit_makes_no_call() {
    LocalSet::new()
        .run_until(async {
            let repo = FakeRepo::with_nearby(Ok(Vec::new()));
            let mut session = started_session(&repo).await;

            session.dispatch(UiEvent::MapClicked(at(1.0, 1.0)));
            for name in ["", "   "] {
                session.dispatch(UiEvent::DraftChanged(DraftField::Name(name.to_owned())));
                session.dispatch(UiEvent::Submit);
                assert!(session.is_idle());
                assert_eq!(
                    session.controller().pending().unwrap().submission(),
                    SubmissionState::Idle
                );
            }
            assert!(repo.create_calls.borrow().is_empty());
        })
        .await;
}

#[tokio::test]
async fn failed_submit_preserves_draft() {
    LocalSet::new()
        .run_until(async {
            let repo = FakeRepo::with_nearby(Ok(Vec::new()));
            let mut session = started_session(&repo).await;
            repo.reply(Reply::Now(Err(RepositoryError::from_status(400, "bad name"))));

            session.dispatch(UiEvent::MapClicked(at(1.0, 1.0)));
            session.dispatch(UiEvent::DraftChanged(DraftField::Name("Kiosk".to_owned())));
            session.dispatch(UiEvent::DraftChanged(DraftField::IsFree(false)));
            let before = session.controller().pending().unwrap().draft().clone();

            session.dispatch(UiEvent::Submit);
            session.settle().await;

            let pending = session.controller().pending().expect("still editing");
            assert_eq!(pending.submission(), SubmissionState::Idle);
            assert_eq!(pending.draft(), &before);
            assert_eq!(
                session.view().error,
                Some(&AppError::CreateFailed("bad name".to_owned()))
            );
            assert!(session.view().dataset.is_empty());
        })
        .await;
}

#[tokio::test]
async fn stale_submit_success_does_not_resurrect_old_draft() {
    LocalSet::new()
        .run_until(async {
            let repo = FakeRepo::with_nearby(Ok(Vec::new()));
            let mut session = started_session(&repo).await;
            let (release, gate) = oneshot::channel();
            repo.reply(Reply::Gated(gate));

            session.dispatch(UiEvent::MapClicked(at(1.0, 1.0)));
            session.dispatch(UiEvent::DraftChanged(DraftField::Name("Slow".to_owned())));
            session.dispatch(UiEvent::Submit);
            tokio::task::yield_now().await;
            assert_eq!(repo.create_calls.borrow().len(), 1);

            session.dispatch(UiEvent::MapClicked(at(2.0, 2.0)));
            release
                .send(Ok(facility("t7", "Slow", at(1.0, 1.0))))
                .unwrap();
            session.settle().await;

            let view = session.view();
            assert_eq!(view.dataset.len(), 1);
            assert_eq!(view.dataset[0].id.as_str(), "t7");
            let Mode::Editing(pending) = view.mode else {
                panic!("expected editing, got {:?}", view.mode);
            };
            assert_eq!(pending.location(), at(2.0, 2.0));
            assert_eq!(pending.submission(), SubmissionState::Idle);
        })
        .await;
}

#[tokio::test]
async fn end_to_end_scenario() {
    LocalSet::new()
        .run_until(async {
            let lake_park = facility("t1", "Lake Park", at(44.98, -93.26));
            let repo = FakeRepo::with_nearby(Ok(vec![lake_park.clone()]));
            let mut session = started_session(&repo).await;

            assert_eq!(session.view().location, LocationState::Resolved(minneapolis()));
            assert_eq!(session.view().dataset, [lake_park.clone()].as_slice());

            session.dispatch(UiEvent::MapClicked(at(44.99, -93.27)));
            {
                let pending = session.controller().pending().unwrap();
                assert_eq!(pending.location(), at(44.99, -93.27));
                assert!(pending.draft().is_free && pending.draft().open_in_winter);
            }

            let created = facility("t2", "New Spot", at(44.99, -93.27));
            repo.reply(Reply::Now(Ok(created.clone())));
            session.dispatch(UiEvent::DraftChanged(DraftField::Name("New Spot".to_owned())));
            session.dispatch(UiEvent::Submit);
            session.settle().await;

            let view = session.view();
            assert_eq!(view.dataset, [lake_park, created].as_slice());
            assert_eq!(view.mode, &Mode::Browsing);
            assert_eq!(repo.create_calls.borrow()[0].name, "New Spot");
        })
        .await;
}
