//! Configuration for auto-refreshing sessions.

use crate::validation::{
    validate_option_key, validate_region, validate_role_arn, validate_session_name, validate_ttl,
};
use crate::{Result, SwoopError};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Default credential time-to-live (15 minutes, the STS minimum).
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

/// Environment variable holding the role ARN for [`RefreshConfig::from_env`].
pub const ENV_ROLE_ARN: &str = "SWOOP_ROLE_ARN";
/// Environment variable holding the role session name.
pub const ENV_SESSION_NAME: &str = "SWOOP_SESSION_NAME";
/// Environment variable holding the TTL in seconds.
pub const ENV_TTL_SECONDS: &str = "SWOOP_TTL_SECONDS";
/// Environment variable holding an STS endpoint override.
pub const ENV_ENDPOINT: &str = "SWOOP_ENDPOINT";

/// Configuration for an [`AutoRefreshableSession`](crate::AutoRefreshableSession).
///
/// Use the builder pattern for ergonomic configuration:
///
/// ```
/// use swoop::RefreshConfig;
/// use std::time::Duration;
///
/// let config = RefreshConfig::new("us-east-1", "arn:aws:iam::123456789012:role/worker", "nightly")
///     .with_ttl(Duration::from_secs(3600))
///     .with_option("profile", "ops");
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    /// AWS region used for the STS client and the returned session
    pub region: String,

    /// ARN of the role to assume
    pub role_arn: String,

    /// Role session name recorded in CloudTrail
    pub session_name: String,

    /// Requested credential lifetime (default: 900 seconds)
    pub ttl: Duration,

    /// Provider-specific options
    pub options: HashMap<String, String>,
}

impl RefreshConfig {
    /// Creates a configuration with the default TTL and no options.
    ///
    /// No validation or I/O happens here; see [`RefreshConfig::validate`].
    pub fn new(
        region: impl Into<String>,
        role_arn: impl Into<String>,
        session_name: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            role_arn: role_arn.into(),
            session_name: session_name.into(),
            ttl: DEFAULT_TTL,
            options: HashMap::new(),
        }
    }

    /// Sets the requested credential lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Adds a provider-specific option.
    ///
    /// Recognized options:
    ///
    /// - `profile`: shared config profile used for ambient credential discovery
    /// - `endpoint`: STS endpoint URL override (LocalStack or an STS VPC endpoint);
    ///   sessions built by the refresher keep the default service endpoints
    /// - `config_file`: alternative path to the shared config file
    /// - `credentials_file`: alternative path to the shared credentials file
    ///
    /// Any other key makes [`RefreshConfig::validate`] fail.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Gets a provider-specific option value.
    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    /// Returns the TTL in whole seconds, as sent to STS.
    pub fn ttl_seconds(&self) -> Result<i32> {
        i32::try_from(self.ttl.as_secs()).map_err(|_| {
            SwoopError::InvalidConfig(format!("ttl out of range: {:?}", self.ttl))
        })
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`SwoopError::InvalidConfig`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        validate_region(&self.region)?;
        validate_role_arn(&self.role_arn)?;
        validate_session_name(&self.session_name)?;
        validate_ttl(self.ttl)?;

        let mut keys: Vec<&String> = self.options.keys().collect();
        keys.sort();
        for key in keys {
            validate_option_key(key)?;
        }

        Ok(())
    }

    /// Builds a configuration from environment variables.
    ///
    /// - `SWOOP_ROLE_ARN` (required)
    /// - `SWOOP_SESSION_NAME` (required)
    /// - `AWS_REGION`, falling back to `AWS_DEFAULT_REGION` (required)
    /// - `SWOOP_TTL_SECONDS` (optional, default 900)
    /// - `AWS_PROFILE` (optional, becomes the `profile` option)
    /// - `SWOOP_ENDPOINT` (optional, becomes the `endpoint` option)
    ///
    /// The result is validated before it is returned.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SwoopError::InvalidConfig(format!("{} is not set", key)))
        };

        let role_arn = require(ENV_ROLE_ARN)?;
        let session_name = require(ENV_SESSION_NAME)?;
        let region = require("AWS_REGION").or_else(|_| {
            require("AWS_DEFAULT_REGION").map_err(|_| {
                SwoopError::InvalidConfig("AWS_REGION is not set".to_string())
            })
        })?;

        let mut config = Self::new(region, role_arn, session_name);

        if let Some(ttl) = lookup(ENV_TTL_SECONDS) {
            let secs: u64 = ttl.parse().map_err(|_| {
                SwoopError::InvalidConfig(format!("{} is not a number: {}", ENV_TTL_SECONDS, ttl))
            })?;
            config = config.with_ttl(Duration::from_secs(secs));
        }

        if let Some(profile) = lookup("AWS_PROFILE").filter(|v| !v.is_empty()) {
            config = config.with_option("profile", profile);
        }

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.is_empty()) {
            config = config.with_option("endpoint", endpoint);
        }

        config.validate()?;
        Ok(config)
    }
}
