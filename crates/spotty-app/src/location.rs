//! Reference-location acquisition with a fixed fallback.

use std::future::Future;
use std::time::Duration;

use spotty_core::{AppConfig, Coordinate};

use crate::{AppError, LocationError};

/// Something that can report the device's current position.
pub trait PositionSource {
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, LocationError>>;
}

/// Position taken from configuration. `None` behaves like a device without
/// a location capability.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredPosition(Option<Coordinate>);

impl ConfiguredPosition {
    #[must_use]
    pub const fn new(position: Option<Coordinate>) -> Self {
        Self(position)
    }
}

impl PositionSource for ConfiguredPosition {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        self.0.ok_or(LocationError::Unavailable)
    }
}

/// Where the session's reference coordinate stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    Resolving,
    Resolved(Coordinate),
    FallbackResolved(Coordinate),
}

impl LocationState {
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Resolving => None,
            Self::Resolved(c) | Self::FallbackResolved(c) => Some(*c),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Resolving)
    }
}

/// Outcome of [`LocationProvider::resolve`]. Always carries a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Device(Coordinate),
    Fallback {
        coordinate: Coordinate,
        reason: LocationError,
    },
}

impl Resolution {
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        match self {
            Self::Device(c) | Self::Fallback { coordinate: c, .. } => *c,
        }
    }

    #[must_use]
    pub const fn state(&self) -> LocationState {
        match self {
            Self::Device(c) => LocationState::Resolved(*c),
            Self::Fallback { coordinate, .. } => LocationState::FallbackResolved(*coordinate),
        }
    }

    /// The advisory to show the user, if the fallback was taken.
    #[must_use]
    pub fn advisory(&self) -> Option<AppError> {
        match self {
            Self::Device(_) => None,
            Self::Fallback { reason, .. } => {
                Some(AppError::LocationUnavailable(reason.to_string()))
            }
        }
    }
}

/// Resolves the reference coordinate exactly once.
///
/// `resolve` consumes the provider, so a second resolution is impossible by
/// construction. The device position is used as reported; any failure or a
/// timeout yields the fallback coordinate instead. There is no retry.
pub struct LocationProvider<S> {
    source: S,
    fallback: Coordinate,
    timeout: Duration,
}

impl<S: PositionSource> LocationProvider<S> {
    #[must_use]
    pub const fn new(source: S, fallback: Coordinate, timeout: Duration) -> Self {
        Self {
            source,
            fallback,
            timeout,
        }
    }

    pub async fn resolve(self) -> Resolution {
        let reason = match tokio::time::timeout(self.timeout, self.source.current_position()).await
        {
            Ok(Ok(coordinate)) => {
                tracing::info!(%coordinate, "resolved device location");
                return Resolution::Device(coordinate);
            }
            Ok(Err(reason)) => reason,
            Err(_) => LocationError::TimedOut,
        };

        tracing::warn!(
            %reason,
            fallback = %self.fallback,
            "device location unavailable, using fallback"
        );
        Resolution::Fallback {
            coordinate: self.fallback,
            reason,
        }
    }
}

impl LocationProvider<ConfiguredPosition> {
    /// Provider backed by the configured device position and fallback.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ConfiguredPosition::new(config.device_location),
            config.fallback_location,
            Duration::from_secs(config.location_timeout_secs),
        )
    }
}
