//! Test doubles for code that uses swoop.
//!
//! [`MockAssumer`] stands in for STS with queued responses and error
//! injection; [`StaticAmbient`] stands in for ambient credential discovery.

use crate::ambient::AmbientSource;
use crate::assume::{AssumeRole, AssumeRoleRequest};
use crate::{CredentialSnapshot, RefreshConfig, Result, SwoopError};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use chrono::{Duration, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory [`AssumeRole`] implementation.
///
/// Clones share state, so a test can keep one handle and give another to the
/// code under test. Queued responses are returned first, in order; once the
/// queue is empty every call returns a freshly generated snapshot valid for
/// the requested duration.
///
/// # Example
///
/// ```
/// use swoop::mock::MockAssumer;
/// use swoop::{AssumeRole, AssumeRoleRequest, SwoopError};
///
/// #[tokio::main]
/// async fn main() {
///     let mock = MockAssumer::new();
///     mock.fail_next(SwoopError::authentication("AccessDenied", "denied")).await;
///
///     let request = AssumeRoleRequest {
///         role_arn: "arn:aws:iam::123456789012:role/test".to_string(),
///         session_name: "doc-test".to_string(),
///         duration_seconds: 900,
///     };
///
///     assert!(mock.assume_role(&request).await.is_err());
///     assert!(mock.assume_role(&request).await.is_ok());
///     assert_eq!(mock.call_count(), 2);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockAssumer {
    responses: Arc<Mutex<VecDeque<Result<CredentialSnapshot>>>>,
    requests: Arc<Mutex<Vec<AssumeRoleRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl MockAssumer {
    /// Creates a mock with an empty response queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a snapshot to return from the next unanswered call.
    pub async fn push_snapshot(&self, snapshot: CredentialSnapshot) {
        self.responses.lock().await.push_back(Ok(snapshot));
    }

    /// Queues an error to return from the next unanswered call.
    pub async fn fail_next(&self, err: SwoopError) {
        self.responses.lock().await.push_back(Err(err));
    }

    /// Number of assume-role calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub async fn requests(&self) -> Vec<AssumeRoleRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl AssumeRole for MockAssumer {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<CredentialSnapshot> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().await.push(request.clone());

        if let Some(response) = self.responses.lock().await.pop_front() {
            return response;
        }

        Ok(CredentialSnapshot::new(
            format!("ASIAMOCK{:08}", n),
            format!("mock-secret-{}", n),
            format!("mock-token-{}", n),
            Utc::now() + Duration::seconds(i64::from(request.duration_seconds)),
        ))
    }
}

/// [`AmbientSource`] returning a fixed SDK configuration.
#[derive(Debug, Clone)]
pub struct StaticAmbient {
    config: SdkConfig,
}

impl StaticAmbient {
    /// Wraps a pre-built configuration.
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    /// Builds a configuration for `region` with static placeholder credentials.
    pub fn for_region(region: impl Into<String>) -> Self {
        let config = SdkConfig::builder()
            .region(Region::new(region.into()))
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "AKIDAMBIENT",
                "ambient-secret",
                None,
                None,
                "StaticAmbient",
            )))
            .build();
        Self::new(config)
    }
}

#[async_trait]
impl AmbientSource for StaticAmbient {
    async fn load(&self, _config: &RefreshConfig) -> SdkConfig {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AssumeRoleRequest {
        AssumeRoleRequest {
            role_arn: "arn:aws:iam::123456789012:role/test".to_string(),
            session_name: "unit-test".to_string(),
            duration_seconds: 900,
        }
    }

    #[tokio::test]
    async fn test_generated_snapshots_are_distinct() {
        let mock = MockAssumer::new();
        let first = mock.assume_role(&request()).await.unwrap();
        let second = mock.assume_role(&request()).await.unwrap();

        assert_ne!(first.access_key, second.access_key);
        assert!(!first.is_expired());
        assert!(first.expiry_time <= Utc::now() + Duration::seconds(900));
    }

    #[tokio::test]
    async fn test_queue_order() {
        let mock = MockAssumer::new();
        let queued = CredentialSnapshot::new("ASIAQUEUED", "s", "t", Utc::now());
        mock.push_snapshot(queued.clone()).await;
        mock.fail_next(SwoopError::network("unreachable")).await;

        assert_eq!(mock.assume_role(&request()).await.unwrap(), queued);
        assert!(mock.assume_role(&request()).await.unwrap_err().is_network());
        assert!(mock.assume_role(&request()).await.is_ok());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockAssumer::new();
        let handle = mock.clone();

        mock.assume_role(&request()).await.unwrap();
        assert_eq!(handle.call_count(), 1);
        assert_eq!(handle.requests().await, vec![request()]);
    }

    #[tokio::test]
    async fn test_static_ambient() {
        let ambient = StaticAmbient::for_region("eu-west-1");
        let config = RefreshConfig::new("us-east-1", "arn:aws:iam::123456789012:role/test", "t1");

        let loaded = ambient.load(&config).await;
        assert_eq!(loaded.region().map(|r| r.as_ref()), Some("eu-west-1"));
        assert!(loaded.credentials_provider().is_some());
    }
}
