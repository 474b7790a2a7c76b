use spotty_core::CoreError;
use thiserror::Error;

/// Errors returned by a facility repository.
///
/// `Display` is the text shown to the user, so variants carry messages that
/// read well on their own.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. `message` is the trimmed
    /// response body, or a generic text when the body was empty.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded into the expected type.
    #[error("could not decode response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Client-side validation rejected the input; no request was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl RepositoryError {
    /// Builds a [`RepositoryError::Status`] from a failed response's body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("request failed with status {status}")
        } else {
            body.to_owned()
        };
        Self::Status { status, message }
    }
}
