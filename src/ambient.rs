//! Ambient credential discovery.
//!
//! The identity used to call STS comes from the host environment: environment
//! variables, shared config/credentials files, or container and instance
//! metadata. [`AmbientSource`] puts that lookup behind a trait so tests can
//! hand in a pre-built [`SdkConfig`] instead of reading real files.

use crate::RefreshConfig;
use async_trait::async_trait;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Source of the SDK configuration used to reach STS.
///
/// Implementations must be `Send + Sync`; the refresh callback may run on any
/// task that resolves credentials.
#[async_trait]
pub trait AmbientSource: Send + Sync + std::fmt::Debug {
    /// Loads a region-scoped SDK configuration for `config`.
    ///
    /// The returned configuration carries the ambient identity, not the
    /// assumed role.
    async fn load(&self, config: &RefreshConfig) -> SdkConfig;
}

/// The SDK's default provider chain.
///
/// Honors the `profile`, `config_file` and `credentials_file` options of
/// [`RefreshConfig`]. The `endpoint` option is STS-only and applied by
/// [`StsAssumer`](crate::StsAssumer). Precedence between environment variables,
/// shared files and metadata services is whatever `aws-config` defines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultChain;

#[async_trait]
impl AmbientSource for DefaultChain {
    async fn load(&self, config: &RefreshConfig) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(profile) = config.get_option("profile") {
            loader = loader.profile_name(profile);
        }

        if let Some(files) = profile_files(config) {
            loader = loader.profile_files(files);
        }

        debug!(region = %config.region, "Loading ambient AWS configuration");
        loader.load().await
    }
}

/// Shared file overrides, or `None` to keep the SDK defaults.
fn profile_files(config: &RefreshConfig) -> Option<ProfileFiles> {
    let config_file = config.get_option("config_file");
    let credentials_file = config.get_option("credentials_file");

    if config_file.is_none() && credentials_file.is_none() {
        return None;
    }

    let mut builder = ProfileFiles::builder();

    builder = match config_file {
        Some(path) => builder.with_file(ProfileFileKind::Config, path),
        None => builder.include_default_config_file(true),
    };

    builder = match credentials_file {
        Some(path) => builder.with_file(ProfileFileKind::Credentials, path),
        None => builder.include_default_credentials_file(true),
    };

    Some(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::ProvideCredentials;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROLE: &str = "arn:aws:iam::123456789012:role/test";

    #[test]
    fn test_profile_files_untouched_without_options() {
        let config = RefreshConfig::new("us-east-1", ROLE, "unit-test");
        assert!(profile_files(&config).is_none());

        let config = config.with_option("profile", "ops");
        assert!(profile_files(&config).is_none());
    }

    #[test]
    fn test_profile_files_with_override() {
        let config = RefreshConfig::new("us-east-1", ROLE, "unit-test")
            .with_option("credentials_file", "/tmp/swoop-credentials");
        assert!(profile_files(&config).is_some());
    }

    #[tokio::test]
    async fn test_default_chain_ignores_sts_endpoint() {
        let config = RefreshConfig::new("us-east-1", ROLE, "unit-test")
            .with_option("endpoint", "https://vpce-123.sts.us-east-1.vpce.amazonaws.com");

        let sdk_config = DefaultChain.load(&config).await;
        assert_eq!(sdk_config.endpoint_url(), None);
    }

    #[tokio::test]
    async fn test_default_chain_reads_custom_shared_files() {
        // Environment credentials take precedence over shared files.
        if std::env::var_os("AWS_ACCESS_KEY_ID").is_some() {
            return;
        }

        let mut credentials = NamedTempFile::new().unwrap();
        writeln!(
            credentials,
            "[swoop-test]\naws_access_key_id = AKIDAMBIENT\naws_secret_access_key = ambientsecret"
        )
        .unwrap();

        let mut shared_config = NamedTempFile::new().unwrap();
        writeln!(shared_config, "[profile swoop-test]\nregion = us-east-1").unwrap();

        let config = RefreshConfig::new("us-east-1", ROLE, "unit-test")
            .with_option("profile", "swoop-test")
            .with_option("config_file", shared_config.path().to_string_lossy())
            .with_option("credentials_file", credentials.path().to_string_lossy());

        let sdk_config = DefaultChain.load(&config).await;
        assert_eq!(sdk_config.region().map(|r| r.as_ref()), Some("us-east-1"));

        let resolved = sdk_config
            .credentials_provider()
            .unwrap()
            .provide_credentials()
            .await
            .unwrap();
        assert_eq!(resolved.access_key_id(), "AKIDAMBIENT");
        assert_eq!(resolved.secret_access_key(), "ambientsecret");
    }
}
