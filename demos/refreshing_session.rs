//! Long-running worker example.
//!
//! Builds one auto-refreshing session and keeps using it well past the
//! credential TTL. Each iteration asks STS who we are; the identity stays the
//! assumed role while the SDK quietly re-assumes it behind the scenes.
//!
//! Run with:
//!   cargo run --example refreshing_session -- arn:aws:iam::123456789012:role/worker
//!
//! Environment variables:
//! - AWS_REGION: region for STS (default: us-east-1)
//! - RUST_LOG: log filter (default: swoop=debug)

use std::env;
use std::time::Duration;
use swoop::{AutoRefreshableSession, RefreshConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> swoop::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swoop=debug")),
        )
        .init();

    let role_arn = env::args()
        .nth(1)
        .unwrap_or_else(|| "arn:aws:iam::123456789012:role/worker".to_string());
    let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    let config = RefreshConfig::new(region, role_arn, "refreshing-session-demo")
        .with_ttl(Duration::from_secs(900));

    let refresher = AutoRefreshableSession::new(config)?;
    let sdk_config = refresher.session().await?;
    let sts = aws_sdk_sts::Client::new(&sdk_config);

    // Four iterations spaced ten minutes apart outlive a 15 minute TTL.
    for iteration in 1..=4 {
        let identity = sts
            .get_caller_identity()
            .send()
            .await
            .map_err(swoop::SwoopError::from_sdk)?;

        println!(
            "iteration {}: running as {}",
            iteration,
            identity.arn().unwrap_or("unknown")
        );

        if iteration < 4 {
            tokio::time::sleep(Duration::from_secs(600)).await;
        }
    }

    Ok(())
}
