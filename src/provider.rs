//! Credentials provider that re-assumes the role on demand.
//!
//! The SDK wraps every credentials provider in its identity cache, which
//! decides when the held credentials are stale (expired, or inside its
//! refresh buffer) and only then calls back into the provider. This provider
//! therefore keeps no cache of its own beyond the one-shot seed.

use crate::assume::{AssumeRole, AssumeRoleRequest};
use crate::{CredentialSnapshot, Result, SwoopError};
use aws_credential_types::provider::{
    self, error::CredentialsError, future, ProvideCredentials,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// [`ProvideCredentials`] implementation backed by an [`AssumeRole`] callback.
#[derive(Debug)]
pub struct RefreshingCredentialsProvider {
    seed: Mutex<Option<CredentialSnapshot>>,
    assumer: Arc<dyn AssumeRole>,
    request: AssumeRoleRequest,
}

impl RefreshingCredentialsProvider {
    /// Creates a provider that calls `assumer` every time credentials are requested.
    pub fn new(assumer: Arc<dyn AssumeRole>, request: AssumeRoleRequest) -> Self {
        Self {
            seed: Mutex::new(None),
            assumer,
            request,
        }
    }

    /// Creates a provider that hands out `initial` on the first request.
    ///
    /// The seed is served once. If it has already expired by then it is
    /// dropped and the callback runs instead.
    pub fn with_initial(
        assumer: Arc<dyn AssumeRole>,
        request: AssumeRoleRequest,
        initial: CredentialSnapshot,
    ) -> Self {
        Self {
            seed: Mutex::new(Some(initial)),
            assumer,
            request,
        }
    }

    /// Returns the seed if it is still usable, otherwise assumes the role again.
    ///
    /// # Errors
    ///
    /// Propagates the callback's error unchanged.
    pub async fn refresh(&self) -> Result<CredentialSnapshot> {
        if let Some(seed) = self.seed.lock().await.take() {
            if !seed.is_expired() {
                debug!(expiry = %seed.expiry_iso8601(), "Serving initial credentials");
                return Ok(seed);
            }
            debug!(expiry = %seed.expiry_iso8601(), "Initial credentials already expired");
        }

        debug!(role_arn = %self.request.role_arn, "Refreshing assumed-role credentials");
        self.assumer.assume_role(&self.request).await
    }

    async fn load_credentials(&self) -> provider::Result {
        let snapshot = self.refresh().await.map_err(credentials_error)?;
        Ok(snapshot.to_sdk_credentials())
    }
}

/// Wraps a [`SwoopError`] for the SDK, keeping it as the error source.
fn credentials_error(err: SwoopError) -> CredentialsError {
    match err {
        SwoopError::InvalidConfig(_) => CredentialsError::invalid_configuration(err),
        other => CredentialsError::provider_error(other),
    }
}

impl ProvideCredentials for RefreshingCredentialsProvider {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(self.load_credentials())
    }
}
