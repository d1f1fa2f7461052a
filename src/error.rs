//! Error types for the log stream provider.

use thiserror::Error;

use crate::management::ManagementError;
use crate::schema::Diagnostic;

/// Errors returned by provider and resource operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// Operation failed due to current state (precondition not met).
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The management API rejected or failed the call.
    #[error("Management API error: {0}")]
    Api(#[from] ManagementError),
}

impl ProviderError {
    /// Get the error message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg)
            | Self::FailedPrecondition(msg) => msg.clone(),
            Self::Serialization(err) => err.to_string(),
            Self::Api(err) => err.to_string(),
        }
    }

    /// Whether this error means the remote object no longer exists.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api(err) => err.is_not_found(),
            _ => false,
        }
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        let summary = match &err {
            ProviderError::NotFound(_) => "Resource not found",
            ProviderError::Validation(_) => "Invalid configuration",
            ProviderError::Configuration(_) => "Provider not configured",
            ProviderError::UnknownResource(_) => "Unknown resource type",
            ProviderError::FailedPrecondition(_) => "Operation not allowed",
            ProviderError::Serialization(_) => "Invalid resource state",
            ProviderError::Api(_) => "Management API request failed",
        };
        Diagnostic::error(summary).with_detail(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("lst_123".to_string());
        assert_eq!(format!("{}", err), "Resource not found: lst_123");

        let err = ProviderError::Validation("invalid input".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid input");

        let err = ProviderError::UnknownResource("auth0_client".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: auth0_client");

        let err = ProviderError::FailedPrecondition("type is immutable".to_string());
        assert_eq!(format!("{}", err), "Failed precondition: type is immutable");
    }

    #[test]
    fn test_api_error_display_is_verbatim() {
        let err: ProviderError = ManagementError::status(400, "Bad Request", "bad sink").into();
        assert_eq!(
            format!("{}", err),
            "Management API error: 400 Bad Request: bad sink"
        );
        assert_eq!(err.message(), "400 Bad Request: bad sink");
    }

    #[test]
    fn test_is_not_found() {
        assert!(ProviderError::NotFound("x".to_string()).is_not_found());
        assert!(ProviderError::Api(ManagementError::not_found("x")).is_not_found());
        assert!(!ProviderError::Api(ManagementError::status(500, "Internal", "x")).is_not_found());
        assert!(!ProviderError::Validation("x".to_string()).is_not_found());
    }

    #[test]
    fn test_error_to_diagnostic() {
        let diag: Diagnostic = ProviderError::Configuration("missing domain".to_string()).into();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.summary, "Provider not configured");
        assert_eq!(
            diag.detail,
            Some("Configuration error: missing domain".to_string())
        );

        let diag: Diagnostic =
            ProviderError::Api(ManagementError::status(403, "Forbidden", "scope")).into();
        assert_eq!(diag.summary, "Management API request failed");
        assert!(diag.detail.unwrap().contains("403 Forbidden: scope"));
    }

    #[test]
    fn test_message_method() {
        let err = ProviderError::NotFound("lst_123".to_string());
        assert_eq!(err.message(), "lst_123");

        let err = ProviderError::Configuration("invalid config".to_string());
        assert_eq!(err.message(), "invalid config");
    }
}
