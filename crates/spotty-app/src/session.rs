//! Single-threaded event loop around [`MapInteractionController`].
//!
//! UI events are applied synchronously through [`Session::dispatch`].
//! Background work (location, fetch, create) runs on `spawn_local` tasks that
//! report back over a channel; [`Session::step`] applies one report at a time,
//! so every state change happens on the interaction task.
//!
//! A `Session` must be driven from inside a [`tokio::task::LocalSet`].

use std::rc::Rc;

use spotty_client::{FacilityRepository, RepositoryError};
use spotty_core::{Coordinate, DraftField, Facility};
use tokio::sync::mpsc;

use crate::controller::{MapInteractionController, Mode};
use crate::location::{LocationProvider, LocationState, PositionSource, Resolution};
use crate::AppError;

/// Input accepted from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    MapClicked(Coordinate),
    DraftChanged(DraftField),
    Submit,
    Cancel,
}

enum Completion {
    Located(Resolution),
    Fetched(Result<Vec<Facility>, RepositoryError>),
    Created {
        generation: u64,
        result: Result<Facility, RepositoryError>,
    },
}

/// Map viewport; centred once, on the first resolved location.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    center: Option<Coordinate>,
}

impl Viewport {
    #[must_use]
    pub const fn center(&self) -> Option<Coordinate> {
        self.center
    }

    /// Returns `true` if this call moved the viewport.
    fn recenter_once(&mut self, center: Coordinate) -> bool {
        if self.center.is_some() {
            return false;
        }
        self.center = Some(center);
        true
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub location: LocationState,
    pub viewport: Viewport,
    pub dataset: &'a [Facility],
    pub mode: &'a Mode,
    pub error: Option<&'a AppError>,
}

pub struct Session<R> {
    repo: Rc<R>,
    radius_km: f64,
    location: LocationState,
    viewport: Viewport,
    controller: MapInteractionController,
    started: bool,
    outstanding: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<R> Session<R>
where
    R: FacilityRepository + 'static,
{
    #[must_use]
    pub fn new(repo: Rc<R>, radius_km: f64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            repo,
            radius_km,
            location: LocationState::Resolving,
            viewport: Viewport::default(),
            controller: MapInteractionController::new(),
            started: false,
            outstanding: 0,
            tx,
            rx,
        }
    }

    /// Begins resolving the reference location. Only the first call has any
    /// effect; the nearby fetch follows once the location is known.
    pub fn start<S>(&mut self, provider: LocationProvider<S>)
    where
        S: PositionSource + 'static,
    {
        if self.started {
            tracing::debug!("session already started");
            return;
        }
        self.started = true;
        self.spawn(async move { Completion::Located(provider.resolve().await) });
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        tracing::debug!(?event, "ui event");
        match event {
            UiEvent::MapClicked(location) => self.controller.map_clicked(location),
            UiEvent::DraftChanged(field) => {
                self.controller.edit(field);
            }
            UiEvent::Cancel => {
                self.controller.cancel();
            }
            UiEvent::Submit => {
                let Some(ticket) = self.controller.begin_submit() else {
                    return;
                };
                let repo = Rc::clone(&self.repo);
                self.spawn(async move {
                    let result = repo.create(ticket.facility()).await;
                    Completion::Created {
                        generation: ticket.generation(),
                        result,
                    }
                });
            }
        }
    }

    /// Waits for the next background task to finish and applies its result.
    ///
    /// Returns `false` immediately when nothing is outstanding.
    pub async fn step(&mut self) -> bool {
        if self.outstanding == 0 {
            return false;
        }
        let Some(completion) = self.rx.recv().await else {
            return false;
        };
        self.outstanding -= 1;
        self.apply(completion);
        true
    }

    /// Applies results until no background task is outstanding.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.outstanding == 0
    }

    #[must_use]
    pub fn view(&self) -> View<'_> {
        View {
            location: self.location,
            viewport: self.viewport,
            dataset: self.controller.dataset(),
            mode: self.controller.mode(),
            error: self.controller.error(),
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &MapInteractionController {
        &self.controller
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Located(resolution) => self.located(&resolution),
            Completion::Fetched(Ok(facilities)) => {
                tracing::info!(count = facilities.len(), "nearby facilities loaded");
                self.controller.replace_dataset(facilities);
            }
            Completion::Fetched(Err(err)) => {
                tracing::warn!(error = %err, "nearby fetch failed");
                self.controller
                    .record_error(AppError::FetchFailed(err.to_string()));
            }
            Completion::Created { generation, result } => {
                self.controller.finish_submit(generation, result);
            }
        }
    }

    fn located(&mut self, resolution: &Resolution) {
        if self.location.is_resolved() {
            tracing::debug!("ignoring repeated location resolution");
            return;
        }
        self.location = resolution.state();
        let center = resolution.coordinate();
        if self.viewport.recenter_once(center) {
            tracing::debug!(%center, "viewport centred");
        }
        if let Some(advisory) = resolution.advisory() {
            self.controller.record_error(advisory);
        }

        let repo = Rc::clone(&self.repo);
        let radius_km = self.radius_km;
        self.spawn(async move { Completion::Fetched(repo.fetch_near(center, radius_km).await) });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Completion> + 'static,
    {
        self.outstanding += 1;
        let tx = self.tx.clone();
        tokio::task::spawn_local(async move {
            // The receiver lives as long as the session; a send error only
            // means the session was dropped first.
            let _ = tx.send(task.await);
        });
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
