//! The editable fields of a facility that has not been created yet.

use crate::{Coordinate, CoreError, NewFacility};

/// Unsaved form state for one facility, anchored at the clicked location.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityDraft {
    pub location: Coordinate,
    pub name: String,
    pub is_free: bool,
    pub running_water: bool,
    pub open_in_winter: bool,
    pub gender_neutral: bool,
}

/// A single field edit coming from the creation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Name(String),
    IsFree(bool),
    RunningWater(bool),
    OpenInWinter(bool),
    GenderNeutral(bool),
}

impl FacilityDraft {
    /// An empty draft at `location`; every amenity flag starts out `true`.
    #[must_use]
    pub const fn at(location: Coordinate) -> Self {
        Self {
            location,
            name: String::new(),
            is_free: true,
            running_water: true,
            open_in_winter: true,
            gender_neutral: true,
        }
    }

    pub fn apply(&mut self, field: DraftField) {
        match field {
            DraftField::Name(name) => self.name = name,
            DraftField::IsFree(v) => self.is_free = v,
            DraftField::RunningWater(v) => self.running_water = v,
            DraftField::OpenInWinter(v) => self.open_in_winter = v,
            DraftField::GenderNeutral(v) => self.gender_neutral = v,
        }
    }

    /// `true` when the name is non-empty after trimming.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Converts the draft into a request body with a trimmed name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyName`] if the name is blank.
    pub fn to_new_facility(&self) -> Result<NewFacility, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(NewFacility {
            name: name.to_owned(),
            location: self.location,
            is_free: self.is_free,
            running_water: self.running_water,
            open_in_winter: self.open_in_winter,
            gender_neutral: self.gender_neutral,
        })
    }
}
