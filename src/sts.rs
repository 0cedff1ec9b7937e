//! AWS STS implementation of [`AssumeRole`].

use crate::ambient::AmbientSource;
use crate::assume::{AssumeRole, AssumeRoleRequest};
use crate::{CredentialSnapshot, RefreshConfig, Result, SwoopError};
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_sts::Client;
use std::sync::Arc;
use tracing::debug;

/// Calls `sts:AssumeRole` with the ambient identity.
///
/// Each call loads the ambient configuration and builds a transient STS
/// client, so calls share no state and can run concurrently. Retry and
/// timeout behavior are the SDK defaults of the ambient configuration.
pub struct StsAssumer {
    config: Arc<RefreshConfig>,
    ambient: Arc<dyn AmbientSource>,
}

impl StsAssumer {
    /// Creates an assumer for `config`, discovering the caller identity through `ambient`.
    pub fn new(config: Arc<RefreshConfig>, ambient: Arc<dyn AmbientSource>) -> Self {
        Self { config, ambient }
    }

    async fn client(&self) -> Client {
        let sdk_config = self.ambient.load(&self.config).await;
        let mut builder = aws_sdk_sts::config::Builder::from(&sdk_config)
            .region(Region::new(self.config.region.clone()));

        // STS endpoint override (LocalStack, STS VPC endpoint)
        if let Some(endpoint) = self.config.get_option("endpoint") {
            builder = builder.endpoint_url(endpoint);
        }

        Client::from_conf(builder.build())
    }
}

impl std::fmt::Debug for StsAssumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StsAssumer")
            .field("region", &self.config.region)
            .field("role_arn", &self.config.role_arn)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AssumeRole for StsAssumer {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<CredentialSnapshot> {
        let client = self.client().await;

        debug!(
            role_arn = %request.role_arn,
            session_name = %request.session_name,
            duration_seconds = request.duration_seconds,
            "Calling AWS STS AssumeRole"
        );

        let output = client
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(&request.session_name)
            .duration_seconds(request.duration_seconds)
            .send()
            .await
            .map_err(SwoopError::from_sdk)?;

        let credentials = output
            .credentials()
            .ok_or(SwoopError::MissingCredentials)?;
        let snapshot = CredentialSnapshot::from_sts(credentials)?;

        debug!(
            role_arn = %request.role_arn,
            expiry = %snapshot.expiry_iso8601(),
            "Received temporary credentials"
        );
        Ok(snapshot)
    }
}
