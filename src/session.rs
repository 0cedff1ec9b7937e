//! Self-refreshing sessions backed by STS AssumeRole.
//!
//! [`AutoRefreshableSession`] is the entry point of the crate. It fetches
//! temporary credentials for a role and produces an [`SdkConfig`] whose
//! credentials provider re-assumes the role whenever the SDK decides the held
//! credentials are stale.

use crate::ambient::{AmbientSource, DefaultChain};
use crate::assume::{AssumeRole, AssumeRoleRequest};
use crate::provider::RefreshingCredentialsProvider;
use crate::sts::StsAssumer;
use crate::{CredentialSnapshot, RefreshConfig, Result};
use aws_config::{Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use std::sync::Arc;
use tracing::info;

/// Produces SDK sessions whose credentials refresh automatically.
///
/// Useful for long-running processes where temporary credentials would
/// otherwise expire between iterations.
///
/// # Example
///
/// ```no_run
/// use swoop::{AutoRefreshableSession, RefreshConfig};
///
/// #[tokio::main]
/// async fn main() -> swoop::Result<()> {
///     let config = RefreshConfig::new(
///         "us-east-1",
///         "arn:aws:iam::123456789012:role/worker",
///         "nightly-batch",
///     );
///
///     let refresher = AutoRefreshableSession::new(config)?;
///     let sdk_config = refresher.session().await?;
///
///     // Any SDK client built from `sdk_config` keeps working past the TTL:
///     // let s3 = aws_sdk_s3::Client::new(&sdk_config);
///     # let _ = sdk_config;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AutoRefreshableSession {
    config: Arc<RefreshConfig>,
    ambient: Arc<dyn AmbientSource>,
    assumer: Arc<dyn AssumeRole>,
}

impl AutoRefreshableSession {
    /// Creates a refresher using the SDK default credential chain.
    ///
    /// No I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`SwoopError::InvalidConfig`](crate::SwoopError::InvalidConfig)
    /// if the configuration fails validation.
    pub fn new(config: RefreshConfig) -> Result<Self> {
        Self::with_ambient(config, DefaultChain)
    }

    /// Creates a refresher that discovers the caller identity through `ambient`.
    pub fn with_ambient(
        config: RefreshConfig,
        ambient: impl AmbientSource + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let config = Arc::new(config);
        let ambient: Arc<dyn AmbientSource> = Arc::new(ambient);
        let assumer = Arc::new(StsAssumer::new(config.clone(), ambient.clone()));

        Ok(Self {
            config,
            ambient,
            assumer,
        })
    }

    /// Creates a refresher with a custom assume-role implementation.
    ///
    /// `ambient` still supplies the base configuration (HTTP client, retry and
    /// timeout settings) of the sessions this refresher builds.
    pub fn with_assumer(
        config: RefreshConfig,
        ambient: impl AmbientSource + 'static,
        assumer: impl AssumeRole + 'static,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            ambient: Arc::new(ambient),
            assumer: Arc::new(assumer),
        })
    }

    /// Returns the configuration this refresher was built with.
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    fn request(&self) -> Result<AssumeRoleRequest> {
        AssumeRoleRequest::from_config(&self.config)
    }

    /// Assumes the role once and returns the issued credentials.
    ///
    /// Every call makes exactly one STS round trip; nothing is cached.
    ///
    /// # Errors
    ///
    /// - [`SwoopError::Authentication`](crate::SwoopError::Authentication):
    ///   the role could not be assumed
    /// - [`SwoopError::Network`](crate::SwoopError::Network):
    ///   STS was unreachable
    pub async fn fetch_credentials(&self) -> Result<CredentialSnapshot> {
        self.assumer.assume_role(&self.request()?).await
    }

    /// Returns a credentials provider without an initial snapshot.
    ///
    /// Every resolution calls STS. Use this to plug the refresh callback into
    /// an SDK configuration you assemble yourself.
    pub fn provider(&self) -> Result<RefreshingCredentialsProvider> {
        Ok(RefreshingCredentialsProvider::new(
            self.assumer.clone(),
            self.request()?,
        ))
    }

    /// Builds an SDK configuration whose credentials refresh automatically.
    ///
    /// Fetches credentials exactly once, seeds the provider with them and
    /// installs the provider on a new configuration derived from the ambient
    /// one, pinned to the configured region. Later refreshes happen when the
    /// SDK resolves credentials; their failures surface from that SDK call,
    /// not from here.
    ///
    /// # Errors
    ///
    /// Returns the error of the initial fetch; no configuration is produced.
    pub async fn session(&self) -> Result<SdkConfig> {
        let initial = self.fetch_credentials().await?;
        let expiry = initial.expiry_iso8601();

        let provider = RefreshingCredentialsProvider::with_initial(
            self.assumer.clone(),
            self.request()?,
            initial,
        );

        let base = self.ambient.load(&self.config).await;
        let sdk_config = base
            .into_builder()
            .region(Region::new(self.config.region.clone()))
            .credentials_provider(SharedCredentialsProvider::new(provider))
            .build();

        info!(
            role_arn = %self.config.role_arn,
            session_name = %self.config.session_name,
            expiry = %expiry,
            "Built auto-refreshing session"
        );
        Ok(sdk_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAssumer, StaticAmbient};
    use crate::SwoopError;
    use aws_credential_types::provider::ProvideCredentials;
    use std::time::Duration;

    const ROLE: &str = "arn:aws:iam::123456789012:role/test";

    fn refresher(mock: &MockAssumer) -> AutoRefreshableSession {
        let config = RefreshConfig::new("us-east-1", ROLE, "unit-test");
        AutoRefreshableSession::with_assumer(
            config,
            StaticAmbient::for_region("us-east-1"),
            mock.clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_construction_validates() {
        let result = AutoRefreshableSession::new(RefreshConfig::new("us-east-1", "", "unit-test"));
        assert!(matches!(result, Err(SwoopError::InvalidConfig(_))));

        let result = AutoRefreshableSession::new(
            RefreshConfig::new("us-east-1", ROLE, "unit-test").with_ttl(Duration::from_secs(10)),
        );
        assert!(matches!(result, Err(SwoopError::InvalidConfig(_))));
    }

    #[test]
    fn test_construction_stores_config_verbatim() {
        let config =
            RefreshConfig::new("us-east-1", ROLE, "unit-test").with_option("profile", "ops");
        let refresher = AutoRefreshableSession::new(config.clone()).unwrap();
        assert_eq!(refresher.config(), &config);
    }

    #[tokio::test]
    async fn test_fetch_credentials_sends_configured_request() {
        let mock = MockAssumer::new();
        let snapshot = refresher(&mock).fetch_credentials().await.unwrap();

        assert!(!snapshot.is_expired());
        assert_eq!(mock.call_count(), 1);

        let requests = mock.requests().await;
        assert_eq!(requests[0].role_arn, ROLE);
        assert_eq!(requests[0].session_name, "unit-test");
        assert_eq!(requests[0].duration_seconds, 900);
    }

    #[tokio::test]
    async fn test_session_fetches_exactly_once() {
        let mock = MockAssumer::new();
        let sdk_config = refresher(&mock).session().await.unwrap();

        assert_eq!(mock.call_count(), 1);
        assert_eq!(sdk_config.region().map(|r| r.as_ref()), Some("us-east-1"));

        // The first resolution is served from the initial snapshot.
        let provider = sdk_config.credentials_provider().unwrap();
        let creds = provider.provide_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "ASIAMOCK00000001");
        assert_eq!(mock.call_count(), 1);

        // Later resolutions go back to STS.
        let creds = provider.provide_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "ASIAMOCK00000002");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_session_uses_configured_region() {
        let mock = MockAssumer::new();
        let refresher = AutoRefreshableSession::with_assumer(
            RefreshConfig::new("us-east-1", ROLE, "unit-test"),
            StaticAmbient::for_region("eu-west-1"),
            mock.clone(),
        )
        .unwrap();

        let sdk_config = refresher.session().await.unwrap();
        assert_eq!(sdk_config.region().map(|r| r.as_ref()), Some("us-east-1"));
    }

    #[tokio::test]
    async fn test_session_keeps_default_service_endpoints() {
        let mock = MockAssumer::new();
        let config = RefreshConfig::new("us-east-1", ROLE, "unit-test")
            .with_option("endpoint", "https://vpce-123.sts.us-east-1.vpce.amazonaws.com");
        let refresher = AutoRefreshableSession::with_assumer(
            config,
            StaticAmbient::for_region("us-east-1"),
            mock.clone(),
        )
        .unwrap();

        let sdk_config = refresher.session().await.unwrap();
        assert_eq!(sdk_config.endpoint_url(), None);
    }

    #[tokio::test]
    async fn test_rejected_role_produces_no_session() {
        let mock = MockAssumer::new();
        mock.fail_next(SwoopError::authentication("AccessDenied", "not authorized"))
            .await;
        mock.fail_next(SwoopError::authentication("AccessDenied", "not authorized"))
            .await;

        let refresher = refresher(&mock);
        let err = refresher.fetch_credentials().await.unwrap_err();
        assert!(err.is_authentication());

        let err = refresher.session().await.unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(
            err.to_string(),
            "authentication failed: AccessDenied: not authorized"
        );
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_on_use() {
        let mock = MockAssumer::new();
        let sdk_config = refresher(&mock).session().await.unwrap();
        mock.fail_next(SwoopError::network("sts unreachable")).await;

        let provider = sdk_config.credentials_provider().unwrap();
        provider.provide_credentials().await.unwrap();
        assert!(provider.provide_credentials().await.is_err());

        // The next attempt recovers.
        assert!(provider.provide_credentials().await.is_ok());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unseeded_provider_calls_every_time() {
        let mock = MockAssumer::new();
        let provider = refresher(&mock).provider().unwrap();

        for _ in 0..3 {
            provider.provide_credentials().await.unwrap();
        }
        assert_eq!(mock.call_count(), 3);
    }
}
