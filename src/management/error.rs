//! Errors returned by the management API client.

use thiserror::Error;

/// HTTP status the management API uses for a missing resource.
pub const STATUS_NOT_FOUND: u16 = 404;

/// An error from a management API call.
#[derive(Debug, Error)]
pub enum ManagementError {
    /// The API answered with a non-success status.
    #[error("{status} {error}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Short error name from the response body (e.g. `Not Found`).
        error: String,
        /// Human-readable message from the response body.
        message: String,
    },

    /// The request could not be sent or the response could not be received.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a valid log stream.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ManagementError {
    /// Build a status error.
    pub fn status(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// Build a 404 error for the given log stream id.
    pub fn not_found(id: &str) -> Self {
        Self::status(
            STATUS_NOT_FOUND,
            "Not Found",
            format!("The log stream does not exist: {}", id),
        )
    }

    /// The HTTP status carried by this error, if the API answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    /// Whether the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(STATUS_NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = ManagementError::not_found("lst_1");
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            format!("{}", err),
            "404 Not Found: The log stream does not exist: lst_1"
        );
    }

    #[test]
    fn test_other_status_is_not_not_found() {
        let err = ManagementError::status(429, "Too Many Requests", "slow down");
        assert!(!err.is_not_found());
        assert_eq!(err.status_code(), Some(429));
    }

    #[test]
    fn test_decode_has_no_status() {
        let err: ManagementError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.status_code(), None);
        assert!(!err.is_not_found());
    }
}
