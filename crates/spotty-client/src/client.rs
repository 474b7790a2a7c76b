//! HTTP client for the facility service.
//!
//! Wraps `reqwest` with status-to-error mapping and typed decoding. Every
//! call is a single attempt: there is no retry layer here.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use spotty_core::{Coordinate, Facility, FacilityId, NewFacility, RatingDraft};

use crate::error::RepositoryError;
use crate::repository::FacilityRepository;

/// Client for the facility service REST API.
///
/// The base URL is injected at construction so tests can point it at a
/// mock server.
#[derive(Debug, Clone)]
pub struct HttpFacilityRepository {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    message: String,
}

impl HttpFacilityRepository {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RepositoryError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, RepositoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so endpoint paths are
        // appended below the base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| RepositoryError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(RepositoryError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "expected an http or https URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches a single facility by id.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::Status`] on a non-2xx status (404 for unknown ids).
    /// - [`RepositoryError::Http`] on network failure.
    /// - [`RepositoryError::Deserialize`] if the body is not a facility.
    pub async fn get(&self, id: &FacilityId) -> Result<Facility, RepositoryError> {
        let url = self.endpoint(&["toilets", id.as_str()]);
        tracing::debug!(%url, "fetching facility");
        let response = self.client.get(url.clone()).send().await?;
        decode(response, &url).await
    }

    /// Submits a cleanliness rating and returns the facility with its
    /// refreshed aggregate.
    ///
    /// # Errors
    ///
    /// Same as [`HttpFacilityRepository::get`].
    pub async fn rate(
        &self,
        id: &FacilityId,
        rating: &RatingDraft,
    ) -> Result<Facility, RepositoryError> {
        let url = self.endpoint(&["toilets", id.as_str(), "ratings"]);
        tracing::debug!(%url, cleanliness = rating.cleanliness(), "submitting rating");
        let response = self.client.post(url.clone()).json(rating).send().await?;
        let facility: Facility = decode(response, &url).await?;
        tracing::info!(
            id = %facility.id,
            rating_count = facility.rating_count,
            "rating recorded"
        );
        Ok(facility)
    }

    /// Checks that the service is reachable and returns its status message.
    ///
    /// # Errors
    ///
    /// Same as [`HttpFacilityRepository::get`].
    pub async fn health(&self) -> Result<String, RepositoryError> {
        let url = self.base_url.clone();
        let response = self.client.get(url.clone()).send().await?;
        let body: HealthResponse = decode(response, &url).await?;
        Ok(body.message)
    }

    /// Builds `base_url/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn near_url(&self, center: Coordinate, radius_km: f64) -> Url {
        let mut url = self.endpoint(&["toilets"]);
        url.query_pairs_mut()
            .append_pair("lat", &center.latitude().to_string())
            .append_pair("lng", &center.longitude().to_string())
            .append_pair("radius_km", &radius_km.to_string());
        url
    }
}

impl FacilityRepository for HttpFacilityRepository {
    async fn fetch_near(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Facility>, RepositoryError> {
        let url = self.near_url(center, radius_km);
        tracing::debug!(%url, "fetching nearby facilities");
        let response = self.client.get(url.clone()).send().await?;
        let facilities: Vec<Facility> = decode(response, &url).await?;
        tracing::info!(
            count = facilities.len(),
            radius_km,
            %center,
            "fetched nearby facilities"
        );
        Ok(facilities)
    }

    async fn create(&self, facility: &NewFacility) -> Result<Facility, RepositoryError> {
        let url = self.endpoint(&["toilets"]);
        tracing::debug!(%url, name = %facility.name, "creating facility");
        let response = self.client.post(url.clone()).json(facility).send().await?;
        let created: Facility = decode(response, &url).await?;
        tracing::info!(id = %created.id, name = %created.name, "facility created");
        Ok(created)
    }
}

/// Maps non-2xx responses to [`RepositoryError::Status`] and decodes the body
/// of successful ones.
async fn decode<T>(response: Response, url: &Url) -> Result<T, RepositoryError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "facility service returned an error");
        return Err(RepositoryError::from_status(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| RepositoryError::Deserialize {
        context: url.path().to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
