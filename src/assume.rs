//! Assume-role capability.
//!
//! [`AssumeRole`] is the refresh callback handed to the SDK. The production
//! implementation is [`StsAssumer`](crate::sts::StsAssumer); tests use
//! [`MockAssumer`](crate::mock::MockAssumer).

use crate::{CredentialSnapshot, RefreshConfig, Result};
use async_trait::async_trait;

/// Parameters of one `AssumeRole` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    /// ARN of the role to assume
    pub role_arn: String,
    /// Role session name
    pub session_name: String,
    /// Requested lifetime in seconds
    pub duration_seconds: i32,
}

impl AssumeRoleRequest {
    /// Builds the request described by a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SwoopError::InvalidConfig`](crate::SwoopError::InvalidConfig)
    /// if the TTL does not fit in an `i32`.
    pub fn from_config(config: &RefreshConfig) -> Result<Self> {
        Ok(Self {
            role_arn: config.role_arn.clone(),
            session_name: config.session_name.clone(),
            duration_seconds: config.ttl_seconds()?,
        })
    }
}

/// Issues assume-role calls.
///
/// Every call must be independent: one request, one fresh snapshot, no
/// caching between calls. Implementations must be `Send + Sync` because the
/// SDK may resolve credentials from several tasks at once.
#[async_trait]
pub trait AssumeRole: Send + Sync + std::fmt::Debug {
    /// Assumes the role and returns the issued credentials.
    ///
    /// # Errors
    ///
    /// - [`SwoopError::Authentication`](crate::SwoopError::Authentication):
    ///   the call was rejected or no ambient identity is available
    /// - [`SwoopError::Network`](crate::SwoopError::Network):
    ///   the token service could not be reached
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<CredentialSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_from_config() {
        let config = RefreshConfig::new(
            "us-east-1",
            "arn:aws:iam::123456789012:role/test",
            "unit-test",
        );

        let request = AssumeRoleRequest::from_config(&config).unwrap();
        assert_eq!(request.role_arn, "arn:aws:iam::123456789012:role/test");
        assert_eq!(request.session_name, "unit-test");
        assert_eq!(request.duration_seconds, 900);
    }

    #[test]
    fn test_request_rejects_huge_ttl() {
        let config = RefreshConfig::new(
            "us-east-1",
            "arn:aws:iam::123456789012:role/test",
            "unit-test",
        )
        .with_ttl(Duration::from_secs(u64::MAX));

        assert!(AssumeRoleRequest::from_config(&config).is_err());
    }
}
