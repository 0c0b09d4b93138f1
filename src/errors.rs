//! Error taxonomy for credential refresh and request authentication.

use http::header::InvalidHeaderValue;
use http::StatusCode;
use thiserror::Error;

/// Failure of a single credential fetch.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The token endpoint could not be reached.
    #[error("token endpoint unreachable: {0}")]
    Network(#[source] reqwest::Error),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    /// The response body could not be read.
    #[error("failed to read token response body: {0}")]
    HttpBody(#[source] reqwest::Error),

    /// The response body is not the expected JSON object.
    #[error("malformed token response: {0}")]
    Decode(#[from] serde_json::Error),

    /// `expires_in` is not a usable number of seconds.
    #[error("invalid expires_in value '{value}': {reason}")]
    Parse { value: String, reason: String },
}

impl ProviderError {
    /// Short label used for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network",
            ProviderError::HttpStatus { .. } | ProviderError::HttpBody(_) => "http",
            ProviderError::Decode(_) => "decode",
            ProviderError::Parse { .. } => "parse",
        }
    }
}

/// Failure to stamp a request with a credential. The request is left untouched.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The provider could not supply a fresh credential.
    #[error("credential refresh failed: {0}")]
    Refresh(#[from] ProviderError),

    /// The token contains bytes that cannot appear in an HTTP header.
    #[error("credential is not a valid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}
