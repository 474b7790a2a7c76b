//! Facility records as exchanged with the remote service.
//!
//! Field names follow the service's JSON shape (`is_free`, `running_water`,
//! `avg_cleanliness`, ...). Amenity attributes the service may leave unset are
//! modelled as `Option<bool>` so "unknown" survives the round trip.

use serde::{Deserialize, Serialize};

use crate::{Coordinate, CoreError};

/// Server-assigned, opaque facility identifier.
///
/// The service may emit ids as JSON numbers or strings; both decode to the
/// same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawFacilityId")]
pub struct FacilityId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFacilityId {
    Text(String),
    Number(i64),
}

impl From<RawFacilityId> for FacilityId {
    fn from(raw: RawFacilityId) -> Self {
        match raw {
            RawFacilityId::Text(s) => Self(s),
            RawFacilityId::Number(n) => Self(n.to_string()),
        }
    }
}

impl FacilityId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A facility as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinate,
    pub is_free: bool,
    #[serde(default)]
    pub running_water: Option<bool>,
    #[serde(default)]
    pub open_in_winter: Option<bool>,
    #[serde(default)]
    pub gender_neutral: Option<bool>,
    #[serde(default)]
    pub wheelchair: Option<bool>,
    #[serde(default)]
    pub indoor: Option<bool>,
    #[serde(default)]
    pub baby_change: Option<bool>,
    #[serde(default)]
    pub menstrual_products: Option<bool>,
    /// Mean cleanliness score (1-5); absent until the first rating.
    #[serde(default, rename = "avg_cleanliness")]
    pub average_cleanliness: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
}

/// Request body for creating a facility.
///
/// Built from a validated [`crate::FacilityDraft`]; the name is already trimmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFacility {
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinate,
    pub is_free: bool,
    pub running_water: bool,
    pub open_in_winter: bool,
    pub gender_neutral: bool,
}

/// A cleanliness rating ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingDraft {
    cleanliness: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl RatingDraft {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRating`] unless `cleanliness` is in `1..=5`.
    pub fn new(cleanliness: u8, comment: Option<String>) -> Result<Self, CoreError> {
        if !(1..=5).contains(&cleanliness) {
            return Err(CoreError::InvalidRating(cleanliness));
        }
        let comment = comment
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());
        Ok(Self {
            cleanliness,
            comment,
        })
    }

    #[must_use]
    pub const fn cleanliness(&self) -> u8 {
        self.cleanliness
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_payload_with_string_id() {
        let json = serde_json::json!({
            "id": "t1",
            "name": "Lake Park",
            "latitude": 44.98,
            "longitude": -93.26,
            "is_free": true,
            "running_water": true,
            "open_in_winter": false,
            "gender_neutral": true,
            "avg_cleanliness": 4.2
        });
        let facility: Facility = serde_json::from_value(json).unwrap();
        assert_eq!(facility.id.as_str(), "t1");
        assert_eq!(facility.name, "Lake Park");
        assert!((facility.location.latitude() - 44.98).abs() < f64::EPSILON);
        assert_eq!(facility.open_in_winter, Some(false));
        assert_eq!(facility.average_cleanliness, Some(4.2));
        assert_eq!(facility.rating_count, 0);
        assert!(facility.wheelchair.is_none());
    }

    #[test]
    fn decodes_numeric_id_and_nulls() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Depot",
            "latitude": 44.9,
            "longitude": -93.2,
            "is_free": false,
            "running_water": null,
            "open_in_winter": null,
            "gender_neutral": null,
            "avg_cleanliness": null,
            "rating_count": 3
        });
        let facility: Facility = serde_json::from_value(json).unwrap();
        assert_eq!(facility.id, FacilityId::new("7"));
        assert!(facility.running_water.is_none());
        assert!(facility.average_cleanliness.is_none());
        assert_eq!(facility.rating_count, 3);
    }

    #[test]
    fn rejects_out_of_range_location() {
        let json = serde_json::json!({
            "id": 1,
            "name": "Nowhere",
            "latitude": 95.0,
            "longitude": 0.0,
            "is_free": true
        });
        assert!(serde_json::from_value::<Facility>(json).is_err());
    }

    #[test]
    fn new_facility_serializes_flat_wire_shape() {
        let body = NewFacility {
            name: "New Spot".to_owned(),
            location: Coordinate::new(44.99, -93.27).unwrap(),
            is_free: true,
            running_water: false,
            open_in_winter: true,
            gender_neutral: true,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "New Spot",
                "latitude": 44.99,
                "longitude": -93.27,
                "is_free": true,
                "running_water": false,
                "open_in_winter": true,
                "gender_neutral": true
            })
        );
    }

    #[test]
    fn rating_draft_rejects_out_of_range_scores() {
        assert_eq!(RatingDraft::new(0, None), Err(CoreError::InvalidRating(0)));
        assert_eq!(RatingDraft::new(6, None), Err(CoreError::InvalidRating(6)));
    }

    #[test]
    fn rating_draft_drops_blank_comment() {
        let rating = RatingDraft::new(4, Some("   ".to_owned())).unwrap();
        assert_eq!(rating.cleanliness(), 4);
        assert!(rating.comment().is_none());

        let json = serde_json::to_value(&rating).unwrap();
        assert_eq!(json, serde_json::json!({ "cleanliness": 4 }));
    }
}
