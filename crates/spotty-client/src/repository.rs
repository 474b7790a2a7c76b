//! The seam between the interaction layer and the remote facility service.

use std::future::Future;

use spotty_core::{Coordinate, Facility, NewFacility};

use crate::RepositoryError;

/// Search radius used for nearby queries unless configured otherwise.
pub const DEFAULT_RADIUS_KM: f64 = 3.0;

/// Source of facility records.
///
/// Implementations perform exactly one attempt per call; callers decide
/// whether to try again.
pub trait FacilityRepository {
    /// Facilities within `radius_km` of `center`, in the order the service
    /// returns them.
    fn fetch_near(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> impl Future<Output = Result<Vec<Facility>, RepositoryError>>;

    /// Creates a facility and returns the stored record with its assigned id.
    fn create(
        &self,
        facility: &NewFacility,
    ) -> impl Future<Output = Result<Facility, RepositoryError>>;
}
