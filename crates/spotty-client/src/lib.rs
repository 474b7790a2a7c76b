pub mod client;
pub mod error;
pub mod repository;

pub use client::HttpFacilityRepository;
pub use error::RepositoryError;
pub use repository::{FacilityRepository, DEFAULT_RADIUS_KM};
