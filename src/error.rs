//! Error types for swoop operations.

use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result type alias using [`SwoopError`].
pub type Result<T> = std::result::Result<T, SwoopError>;

/// Boxed error kept as the source of SDK-originated failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while assuming a role or building a session.
///
/// SDK failures keep the original SDK error as their `source()`, so callers
/// can downcast to `SdkError<AssumeRoleError>` when they need the raw details.
#[derive(Debug, Error)]
pub enum SwoopError {
    /// The assume-role call was rejected, or no usable ambient identity exists.
    ///
    /// Typical causes: malformed role ARN, trust-policy denial, expired or
    /// missing ambient credentials.
    #[error("authentication failed: {code}: {message}")]
    Authentication {
        /// Service error code (e.g. `AccessDenied`, `ExpiredToken`)
        code: String,
        /// Human-readable message from the service
        message: String,
        /// Underlying SDK error
        #[source]
        source: Option<BoxError>,
    },

    /// STS could not be reached, timed out, or returned an unreadable response.
    #[error("network error: {message}")]
    Network {
        /// Description of the transport failure
        message: String,
        /// Underlying SDK error
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// STS answered without a credentials block.
    #[error("assume-role response contained no credentials")]
    MissingCredentials,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SwoopError {
    /// Creates an authentication error without an underlying SDK error.
    ///
    /// # Example
    ///
    /// ```
    /// use swoop::SwoopError;
    ///
    /// let err = SwoopError::authentication("AccessDenied", "not authorized");
    /// assert_eq!(err.to_string(), "authentication failed: AccessDenied: not authorized");
    /// ```
    pub fn authentication(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            code: code.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a network error without an underlying SDK error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Classifies an SDK error into [`SwoopError::Authentication`] or
    /// [`SwoopError::Network`], keeping the SDK error as the source.
    ///
    /// - service errors (the call reached STS and was rejected) are authentication failures
    /// - dispatch failures caused by I/O or timeouts are network failures
    /// - other dispatch failures happen before the request is sent, usually
    ///   because the ambient credential chain found nothing; those count as
    ///   authentication failures
    /// - timeouts and unreadable responses are network failures
    pub fn from_sdk<E, R>(err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        match &err {
            SdkError::ServiceError(service) => {
                let code = service.err().code().unwrap_or("Unknown").to_string();
                let message = service.err().message().unwrap_or_default().to_string();
                Self::Authentication {
                    code,
                    message,
                    source: Some(Box::new(err)),
                }
            }
            SdkError::DispatchFailure(dispatch) if dispatch.is_io() || dispatch.is_timeout() => {
                Self::Network {
                    message: DisplayErrorContext(&err).to_string(),
                    source: Some(Box::new(err)),
                }
            }
            SdkError::DispatchFailure(_) => Self::Authentication {
                code: "CredentialsUnavailable".to_string(),
                message: DisplayErrorContext(&err).to_string(),
                source: Some(Box::new(err)),
            },
            SdkError::TimeoutError(_) | SdkError::ResponseError(_) => Self::Network {
                message: DisplayErrorContext(&err).to_string(),
                source: Some(Box::new(err)),
            },
            _ => Self::Other(anyhow::Error::new(err)),
        }
    }

    /// Returns `true` for [`SwoopError::Authentication`].
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` for [`SwoopError::Network`].
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = SwoopError::InvalidConfig("region cannot be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: region cannot be empty"
        );

        let err = SwoopError::network("connection refused");
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn test_error_kinds() {
        assert!(SwoopError::authentication("AccessDenied", "denied").is_authentication());
        assert!(!SwoopError::authentication("AccessDenied", "denied").is_network());
        assert!(SwoopError::network("unreachable").is_network());
        assert!(!SwoopError::MissingCredentials.is_authentication());
    }

    #[test]
    fn test_manual_errors_have_no_source() {
        let err = SwoopError::authentication("ExpiredToken", "token expired");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: SwoopError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
