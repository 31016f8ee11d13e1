use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the prediction scoring API
#[derive(Error, Debug)]
pub enum BackendApiError {
    /// Invalid request parameters (HTTP 400) or backend-side schema rejection (HTTP 422)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Invalid API key - authentication failed")]
    InvalidApiKey,

    /// Model not found on the backend (HTTP 404)
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error from the scoring service (HTTP 500, 502, 503, 504)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Unknown or unexpected error
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl BackendApiError {
    /// Classify an HTTP error status into a backend error.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::InvalidRequest(body)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::InvalidApiKey,
            StatusCode::NOT_FOUND => Self::ModelNotFound(body),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Timeout,
            s if s.is_server_error() => Self::ServerError(s, body),
            s => Self::UnknownError(s, body),
        }
    }

    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded
                | Self::ServerError(_, _)
                | Self::Timeout
                | Self::NetworkError(_)
        )
    }

    /// Returns true if this is a permanent error that should not be retried
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::InvalidApiKey | Self::ModelNotFound(_)
        )
    }
}
