//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::IntegrityFailure`] → 422
/// - [`ServiceError::Unavailable`] → 503
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: invalid JSON, bad base64 or wrong field lengths.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The authentication tag did not verify: the payload was tampered with,
    /// corrupted, or sealed under a different secret.
    #[error("integrity failure: {0}")]
    IntegrityFailure(String),

    /// The encryption secret is not configured.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::IntegrityFailure(_) => 422,
            ServiceError::Unavailable(_) => 503,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::IntegrityFailure(_) => "integrity_failure",
            ServiceError::Unavailable(_) => "service_unavailable",
        }
    }
}
