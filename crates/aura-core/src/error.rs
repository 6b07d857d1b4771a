//! Error handling for Aura API calls
//!
//! HTTP failures are classified into variants so callers can branch on the
//! kind of failure without inspecting status codes.
//!
//! # Example
//!
//! ```rust
//! use aura_core::ApiError;
//!
//! let err = ApiError::NotFound {
//!     message: "instance not found".to_string(),
//! };
//! assert!(err.is_not_found());
//! assert!(!err.is_retryable());
//! ```

use thiserror::Error;

/// Errors returned by the Aura API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// 400 / 422
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// 401 / 403, or a rejected token exchange
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// 404
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// 409
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// 429
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// 5xx
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },

    /// Transport failure (connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The configured base URL could not be used to build a request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Map an HTTP status and response body onto an error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => ApiError::BadRequest { message },
            401 | 403 => ApiError::AuthenticationFailed { message },
            404 => ApiError::NotFound { message },
            409 => ApiError::Conflict { message },
            429 => ApiError::RateLimited { message },
            500..=599 => ApiError::ServerError { status, message },
            _ => ApiError::Unexpected { status, message },
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::AuthenticationFailed { .. })
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::ServerError { .. })
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Request(e) if e.is_timeout())
    }

    /// Returns true if this is a rate limiting error (429)
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// Returns true if retrying the same call might succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_server_error() || self.is_rate_limited() || self.is_timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(ApiError::from_status(404, "gone").is_not_found());
        assert!(ApiError::from_status(401, "bad token").is_unauthorized());
        assert!(ApiError::from_status(403, "forbidden").is_unauthorized());
        assert!(ApiError::from_status(429, "slow down").is_rate_limited());
        assert!(ApiError::from_status(503, "down").is_server_error());
        assert!(matches!(
            ApiError::from_status(422, "bad field"),
            ApiError::BadRequest { .. }
        ));
        assert!(matches!(
            ApiError::from_status(418, "teapot"),
            ApiError::Unexpected { status: 418, .. }
        ));
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::from_status(500, "boom").is_retryable());
        assert!(ApiError::from_status(429, "slow down").is_retryable());
        assert!(!ApiError::from_status(404, "gone").is_retryable());
        assert!(!ApiError::InvalidResponse("garbage".to_string()).is_retryable());
    }

    #[test]
    fn test_display_preserves_message() {
        let err = ApiError::from_status(502, "upstream gateway failed");
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream gateway failed"));
    }
}
