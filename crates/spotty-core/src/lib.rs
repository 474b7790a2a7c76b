pub mod app_config;
pub mod config;
pub mod draft;
pub mod facility;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use draft::{DraftField, FacilityDraft};
pub use facility::{Facility, FacilityId, NewFacility, RatingDraft};
pub use geo::Coordinate;

use thiserror::Error;

/// Validation failures for domain values, raised before any I/O happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("facility name must not be empty")]
    EmptyName,

    #[error("cleanliness rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
