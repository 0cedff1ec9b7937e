//! Input validation for refresh configuration.
//!
//! STS rejects malformed inputs anyway, but only after a network round trip
//! and with an authentication-flavored error. Checking up front turns those
//! mistakes into [`SwoopError::InvalidConfig`] at construction time.

use crate::{Result, SwoopError};
use std::time::Duration;

/// Shortest duration STS accepts for `AssumeRole`.
pub const MIN_TTL_SECONDS: u64 = 900;

/// Longest duration STS accepts for `AssumeRole` (role maximum session duration cap).
pub const MAX_TTL_SECONDS: u64 = 43_200;

/// Characters allowed in a role session name besides ASCII alphanumerics.
const SESSION_NAME_EXTRA_CHARS: &str = "+=,.@_-";

/// Option keys understood by [`crate::RefreshConfig`].
pub const KNOWN_OPTIONS: &[&str] = &["profile", "endpoint", "config_file", "credentials_file"];

/// Validates an AWS region name such as `us-east-1`.
///
/// # Example
///
/// ```
/// use swoop::validation::validate_region;
///
/// assert!(validate_region("us-east-1").is_ok());
/// assert!(validate_region("").is_err());
/// assert!(validate_region("US East").is_err());
/// ```
pub fn validate_region(region: &str) -> Result<()> {
    if region.is_empty() {
        return Err(SwoopError::InvalidConfig(
            "region cannot be empty".to_string(),
        ));
    }

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SwoopError::InvalidConfig(format!(
            "region contains invalid characters: {}",
            region
        )));
    }

    Ok(())
}

/// Validates an IAM role ARN: `arn:<partition>:iam::<account>:role/<name>`.
///
/// # Example
///
/// ```
/// use swoop::validation::validate_role_arn;
///
/// assert!(validate_role_arn("arn:aws:iam::123456789012:role/deploy").is_ok());
/// assert!(validate_role_arn("arn:aws-cn:iam::123456789012:role/path/to/deploy").is_ok());
///
/// assert!(validate_role_arn("").is_err());
/// assert!(validate_role_arn("arn:aws:iam::123456789012:user/alice").is_err());
/// assert!(validate_role_arn("arn:aws:s3:::bucket").is_err());
/// ```
pub fn validate_role_arn(role_arn: &str) -> Result<()> {
    if role_arn.is_empty() {
        return Err(SwoopError::InvalidConfig(
            "role ARN cannot be empty".to_string(),
        ));
    }

    let invalid = || SwoopError::InvalidConfig(format!("malformed role ARN: {}", role_arn));

    // arn : partition : service : region : account : resource
    let parts: Vec<&str> = role_arn.splitn(6, ':').collect();
    let &[prefix, partition, service, region, account, resource] = parts.as_slice() else {
        return Err(invalid());
    };

    if prefix != "arn" || partition.is_empty() || service != "iam" || !region.is_empty() {
        return Err(invalid());
    }

    if account.len() != 12 || !account.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    match resource.strip_prefix("role/") {
        Some(name) if !name.is_empty() && !name.ends_with('/') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a role session name (2 to 64 characters of `[A-Za-z0-9+=,.@_-]`).
///
/// # Example
///
/// ```
/// use swoop::validation::validate_session_name;
///
/// assert!(validate_session_name("nightly-worker").is_ok());
/// assert!(validate_session_name("svc@example.com").is_ok());
/// assert!(validate_session_name("x").is_err());
/// assert!(validate_session_name("has space").is_err());
/// ```
pub fn validate_session_name(session_name: &str) -> Result<()> {
    if session_name.is_empty() {
        return Err(SwoopError::InvalidConfig(
            "session name cannot be empty".to_string(),
        ));
    }

    if !(2..=64).contains(&session_name.len()) {
        return Err(SwoopError::InvalidConfig(format!(
            "session name must be between 2 and 64 characters: {}",
            session_name
        )));
    }

    if !session_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SESSION_NAME_EXTRA_CHARS.contains(c))
    {
        return Err(SwoopError::InvalidConfig(format!(
            "session name contains invalid characters (allowed: alphanumerics and {})",
            SESSION_NAME_EXTRA_CHARS
        )));
    }

    Ok(())
}

/// Validates a credential time-to-live.
///
/// The TTL must be a whole number of seconds between
/// [`MIN_TTL_SECONDS`] and [`MAX_TTL_SECONDS`].
pub fn validate_ttl(ttl: Duration) -> Result<()> {
    if ttl.subsec_nanos() != 0 {
        return Err(SwoopError::InvalidConfig(format!(
            "ttl must be a whole number of seconds, got {:?}",
            ttl
        )));
    }

    let secs = ttl.as_secs();
    if !(MIN_TTL_SECONDS..=MAX_TTL_SECONDS).contains(&secs) {
        return Err(SwoopError::InvalidConfig(format!(
            "ttl must be between {} and {} seconds, got {}",
            MIN_TTL_SECONDS, MAX_TTL_SECONDS, secs
        )));
    }

    Ok(())
}

/// Validates a provider option key against [`KNOWN_OPTIONS`].
pub fn validate_option_key(key: &str) -> Result<()> {
    if KNOWN_OPTIONS.contains(&key) {
        Ok(())
    } else {
        Err(SwoopError::InvalidConfig(format!(
            "unknown option: {} (known options: {})",
            key,
            KNOWN_OPTIONS.join(", ")
        )))
    }
}
