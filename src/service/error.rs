//! Service error taxonomy.
//!
//! [`ServiceError`] is what backends return.  [`ErrorKind`] is the cloneable,
//! comparable summary that ends up inside published outcomes, so subscribers
//! never see a backend-specific type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Errors raised by an external translation or image service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The capability is not supported on this host (or the backend cannot be
    /// reached at all).
    #[error("service is not available on this host")]
    Unavailable,

    /// HTTP transport error other than a refused connection.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("service request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("service returned HTTP {0}")]
    Status(u16),

    /// The response body could not be parsed as expected.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The response contained no usable content.
    #[error("service returned an empty response")]
    EmptyResponse,
}

impl ServiceError {
    /// `true` for the "not supported here" condition that triggers the
    /// generation pipeline's local fallback.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ServiceError::Unavailable)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Unavailable => ErrorKind::Unavailable,
            other => ErrorKind::Service(other.to_string()),
        }
    }

    /// Map an HTTP status to an error; `None` for success codes.
    ///
    /// 404 and 501 mean the endpoint does not exist on this backend, which is
    /// reported as [`ServiceError::Unavailable`].
    pub fn from_status(status: reqwest::StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        match status.as_u16() {
            404 | 501 => Some(ServiceError::Unavailable),
            code => Some(ServiceError::Status(code)),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else if e.is_connect() {
            ServiceError::Unavailable
        } else {
            ServiceError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Error carried by a `Failed` outcome or pipeline state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("not supported on this device")]
    Unavailable,

    #[error("{0}")]
    Service(String),
}

impl ErrorKind {
    /// Banner text for a failed translation.
    pub fn translation_message(&self) -> String {
        match self {
            ErrorKind::Unavailable => "Translation isn't supported on this device.".into(),
            ErrorKind::Service(_) => "Translation failed.".into(),
        }
    }

    /// Banner text for a failed image generation.
    pub fn generation_message(&self) -> String {
        match self {
            ErrorKind::Unavailable => "Image creation isn't supported on this device.".into(),
            ErrorKind::Service(detail) => format!("Failed to generate images: {detail}"),
        }
    }
}
