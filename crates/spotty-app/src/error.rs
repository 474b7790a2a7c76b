use thiserror::Error;

/// User-visible failures. None of them is fatal: each leaves the session in
/// a usable state, and `Display` is the text shown in the error slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// No device position; the fallback coordinate is in use.
    #[error("Could not determine your location ({0}); showing the default area instead.")]
    LocationUnavailable(String),

    /// Nearby facilities could not be loaded; the previous list is kept.
    #[error("Could not load nearby facilities: {0}")]
    FetchFailed(String),

    /// The facility was not created; the draft is kept for another try.
    #[error("Could not add facility: {0}")]
    CreateFailed(String),
}

/// Why a device position could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location is not available on this device")]
    Unavailable,

    #[error("location permission denied")]
    Denied,

    #[error("location request timed out")]
    TimedOut,

    #[error("{0}")]
    Failed(String),
}
