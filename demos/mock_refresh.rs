//! Offline example using the mock assumer.
//!
//! Shows the refresh cycle without AWS access: the first credential lookup is
//! served from the snapshot fetched while building the session, every later
//! one triggers a new assume-role call, and injected failures surface at the
//! lookup that hit them.
//!
//! Run with: cargo run --example mock_refresh

use aws_credential_types::provider::ProvideCredentials;
use swoop::mock::{MockAssumer, StaticAmbient};
use swoop::{AutoRefreshableSession, RefreshConfig, SwoopError};

#[tokio::main]
async fn main() -> swoop::Result<()> {
    println!("=== Mock Refresh Example ===\n");

    let mock = MockAssumer::new();
    let config = RefreshConfig::new(
        "us-east-1",
        "arn:aws:iam::123456789012:role/demo",
        "mock-demo",
    );
    let refresher = AutoRefreshableSession::with_assumer(
        config,
        StaticAmbient::for_region("us-east-1"),
        mock.clone(),
    )?;

    let sdk_config = refresher.session().await?;
    println!("1. Session built ({} assume-role call)", mock.call_count());

    let Some(provider) = sdk_config.credentials_provider() else {
        return Err(SwoopError::Other(anyhow::anyhow!("session has no credentials provider")));
    };

    for lookup in 1..=3 {
        match provider.provide_credentials().await {
            Ok(creds) => println!(
                "2.{} Lookup -> {} (calls so far: {})",
                lookup,
                creds.access_key_id(),
                mock.call_count()
            ),
            Err(e) => println!("2.{} Lookup failed: {}", lookup, e),
        }
    }

    mock.fail_next(SwoopError::authentication("ExpiredToken", "ambient token expired"))
        .await;
    match provider.provide_credentials().await {
        Ok(_) => println!("3. Unexpected success"),
        Err(e) => println!("3. Injected failure surfaced on use: {}", e),
    }

    println!("\nTotal assume-role calls: {}", mock.call_count());
    Ok(())
}
