//! The map interaction state machine.
//!
//! [`MapInteractionController`] owns the facility dataset, the single
//! pending-creation slot and the error slot. It performs no I/O: a submit
//! hands out a [`SubmitTicket`], and the caller reports the repository's
//! answer back through [`MapInteractionController::finish_submit`].

use spotty_client::RepositoryError;
use spotty_core::{Coordinate, DraftField, Facility, FacilityDraft, NewFacility};

use crate::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// The one unsaved draft the user is editing.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCreation {
    draft: FacilityDraft,
    submission: SubmissionState,
    /// Distinguishes this draft from every earlier one.
    generation: u64,
}

impl PendingCreation {
    #[must_use]
    pub const fn draft(&self) -> &FacilityDraft {
        &self.draft
    }

    #[must_use]
    pub const fn location(&self) -> Coordinate {
        self.draft.location
    }

    #[must_use]
    pub const fn submission(&self) -> SubmissionState {
        self.submission
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Browsing,
    Editing(PendingCreation),
}

/// Proof that a submission was started, carrying the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    generation: u64,
    facility: NewFacility,
}

impl SubmitTicket {
    #[must_use]
    pub const fn facility(&self) -> &NewFacility {
        &self.facility
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct MapInteractionController {
    mode: Mode,
    dataset: Vec<Facility>,
    error: Option<AppError>,
    next_generation: u64,
    /// Generation of the submission currently awaiting an answer.
    in_flight: Option<u64>,
}

impl MapInteractionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingCreation> {
        match &self.mode {
            Mode::Browsing => None,
            Mode::Editing(pending) => Some(pending),
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &[Facility] {
        &self.dataset
    }

    #[must_use]
    pub const fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn has_submission_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Opens a fresh draft at `location`, discarding any previous one.
    ///
    /// A submission already in flight keeps running; its answer will no
    /// longer affect the mode.
    pub fn map_clicked(&mut self, location: Coordinate) {
        self.next_generation += 1;
        let generation = self.next_generation;
        if let Mode::Editing(previous) = &self.mode {
            tracing::debug!(
                previous = %previous.location(),
                %location,
                "replacing unsaved draft"
            );
        }
        self.mode = Mode::Editing(PendingCreation {
            draft: FacilityDraft::at(location),
            submission: SubmissionState::Idle,
            generation,
        });
    }

    /// Applies a form edit to the open draft. Returns `false` while browsing.
    pub fn edit(&mut self, field: DraftField) -> bool {
        match &mut self.mode {
            Mode::Editing(pending) => {
                pending.draft.apply(field);
                true
            }
            Mode::Browsing => {
                tracing::debug!(?field, "ignoring draft edit while browsing");
                false
            }
        }
    }

    /// Discards the open draft. Returns `false` if there was none.
    pub fn cancel(&mut self) -> bool {
        let was_editing = matches!(self.mode, Mode::Editing(_));
        self.mode = Mode::Browsing;
        was_editing
    }

    /// Starts submitting the open draft.
    ///
    /// Returns `None`, changing nothing, when browsing, when the name is
    /// blank, when this draft is already submitting, or while any earlier
    /// submission is still awaiting its answer.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if let Some(generation) = self.in_flight {
            tracing::debug!(generation, "submit ignored: another submission is in flight");
            return None;
        }
        let Mode::Editing(pending) = &mut self.mode else {
            return None;
        };
        if pending.submission == SubmissionState::Submitting {
            return None;
        }
        let Ok(facility) = pending.draft.to_new_facility() else {
            tracing::debug!("submit ignored: draft name is blank");
            return None;
        };

        pending.submission = SubmissionState::Submitting;
        self.in_flight = Some(pending.generation);
        Some(SubmitTicket {
            generation: pending.generation,
            facility,
        })
    }

    /// Applies the repository's answer to a submission.
    ///
    /// Success appends the created facility whether or not its draft is still
    /// open; only the draft that was submitted returns to browsing. Failure
    /// fills the error slot and, if the draft is still open, makes it
    /// submittable again with its fields untouched.
    pub fn finish_submit(
        &mut self,
        generation: u64,
        result: Result<Facility, RepositoryError>,
    ) {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }
        let current = match &mut self.mode {
            Mode::Editing(pending) if pending.generation == generation => Some(pending),
            _ => None,
        };

        match result {
            Ok(facility) => {
                let is_current = current.is_some();
                if is_current {
                    self.mode = Mode::Browsing;
                }
                if self.dataset.iter().any(|f| f.id == facility.id) {
                    tracing::debug!(id = %facility.id, "created facility already listed");
                } else {
                    tracing::info!(id = %facility.id, stale = !is_current, "appending created facility");
                    self.dataset.push(facility);
                }
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "facility submission failed");
                if let Some(pending) = current {
                    pending.submission = SubmissionState::Idle;
                }
                self.error = Some(AppError::CreateFailed(err.to_string()));
            }
        }
    }

    /// Replaces the dataset wholesale with a fresh fetch result.
    pub fn replace_dataset(&mut self, facilities: Vec<Facility>) {
        self.dataset = facilities;
    }

    /// Puts `error` in the error slot, replacing whatever was there.
    pub fn record_error(&mut self, error: AppError) {
        self.error = Some(error);
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
