//! Swoop - auto-refreshing AWS sessions backed by STS AssumeRole.
//!
//! Long-running processes that assume a role get credentials that expire
//! after the requested TTL. Swoop registers an assume-role callback with the
//! AWS SDK's credentials machinery so an [`SdkConfig`](aws_config::SdkConfig)
//! keeps working indefinitely: the SDK's identity cache notices when the
//! credentials are about to expire and calls back into swoop for new ones.
//!
//! # Features
//!
//! - **Drop-in**: returns a plain `SdkConfig`, usable with any service client
//! - **No hidden state**: every refresh is one independent `AssumeRole` call
//! - **Injected ambient identity**: swap the credential discovery for tests
//! - **Error Context**: authentication and network failures keep the SDK error as source
//!
//! # Quick Start
//!
//! ```no_run
//! use swoop::{AutoRefreshableSession, RefreshConfig};
//!
//! #[tokio::main]
//! async fn main() -> swoop::Result<()> {
//!     let config = RefreshConfig::new(
//!         "us-east-1",
//!         "arn:aws:iam::123456789012:role/worker",
//!         "nightly-batch",
//!     );
//!
//!     let refresher = AutoRefreshableSession::new(config)?;
//!
//!     // One-off credentials
//!     let snapshot = refresher.fetch_credentials().await?;
//!     println!("expires at {}", snapshot.expiry_iso8601());
//!
//!     // Or a session that refreshes itself
//!     let sdk_config = refresher.session().await?;
//!     # let _ = sdk_config;
//!     Ok(())
//! }
//! ```
//!
//! # Ambient credentials
//!
//! The identity that calls STS is discovered the way the SDK always does it:
//! environment variables, `~/.aws/config` and `~/.aws/credentials`, then
//! container and instance metadata. Use the `profile`, `config_file` and
//! `credentials_file` options to steer that lookup.
//!
//! # Feature Flags
//!
//! | Flag | Default | Provides |
//! |------|---------|----------|
//! | `mock` | yes | [`mock::MockAssumer`] and [`mock::StaticAmbient`] test doubles |

pub mod ambient;
pub mod assume;
pub mod config;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod session;
pub mod sts;
pub mod validation;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use ambient::{AmbientSource, DefaultChain};
pub use assume::{AssumeRole, AssumeRoleRequest};
pub use config::RefreshConfig;
pub use credentials::CredentialSnapshot;
pub use error::{Result, SwoopError};
pub use provider::RefreshingCredentialsProvider;
pub use session::AutoRefreshableSession;
pub use sts::StsAssumer;
