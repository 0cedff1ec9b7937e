//! Credential snapshot produced by each assume-role call.

use crate::{Result, SwoopError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Provider name reported to the SDK for credentials produced by this crate.
pub const PROVIDER_NAME: &str = "AutoRefreshableSession";

/// Temporary credentials returned by one `AssumeRole` call.
///
/// Snapshots are never mutated; a refresh produces a new one. The JSON form
/// uses the keys `access_key`, `secret_key`, `token` and `expiry_time`, with
/// the expiry written as ISO-8601 including an explicit `+00:00` offset.
///
/// `Debug` output redacts the secret key and session token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSnapshot {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Session token
    pub token: String,

    /// When these credentials stop being accepted
    #[serde(with = "iso8601")]
    pub expiry_time: DateTime<Utc>,
}

impl CredentialSnapshot {
    /// Creates a snapshot from its four parts.
    ///
    /// # Example
    ///
    /// ```
    /// use swoop::CredentialSnapshot;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let snapshot = CredentialSnapshot::new(
    ///     "AKIA...",
    ///     "secret",
    ///     "tok",
    ///     Utc.with_ymd_and_hms(2024, 1, 1, 0, 15, 0).unwrap(),
    /// );
    /// assert_eq!(snapshot.expiry_iso8601(), "2024-01-01T00:15:00+00:00");
    /// ```
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        token: impl Into<String>,
        expiry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            token: token.into(),
            expiry_time,
        }
    }

    /// Maps the credentials block of an STS response.
    pub fn from_sts(credentials: &aws_sdk_sts::types::Credentials) -> Result<Self> {
        let expiration = credentials.expiration();
        let expiry_time = DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos())
            .ok_or_else(|| {
                SwoopError::Other(anyhow::anyhow!(
                    "credential expiration out of range: {:?}",
                    expiration
                ))
            })?;

        Ok(Self {
            access_key: credentials.access_key_id().to_string(),
            secret_key: credentials.secret_access_key().to_string(),
            token: credentials.session_token().to_string(),
            expiry_time,
        })
    }

    /// Returns the expiry as ISO-8601, e.g. `2024-01-01T00:15:00+00:00`.
    pub fn expiry_iso8601(&self) -> String {
        self.expiry_time.to_rfc3339()
    }

    /// Checks whether the snapshot has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry_time
    }

    /// Checks whether the snapshot has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Converts into SDK credentials carrying the same expiry.
    pub fn to_sdk_credentials(&self) -> aws_credential_types::Credentials {
        aws_credential_types::Credentials::new(
            self.access_key.clone(),
            self.secret_key.clone(),
            Some(self.token.clone()),
            Some(SystemTime::from(self.expiry_time)),
            PROVIDER_NAME,
        )
    }

    /// Serializes the snapshot to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl std::fmt::Debug for CredentialSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSnapshot")
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .field("token", &"** redacted **")
            .field("expiry_time", &self.expiry_iso8601())
            .finish()
    }
}

impl From<&CredentialSnapshot> for aws_credential_types::Credentials {
    fn from(snapshot: &CredentialSnapshot) -> Self {
        snapshot.to_sdk_credentials()
    }
}

mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
