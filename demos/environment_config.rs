//! Environment-based configuration example.
//!
//! Demonstrates how to configure the refresher from environment variables.
//! This is useful for 12-factor apps and container deployments.
//!
//! Run with: cargo run --example environment_config
//!
//! Environment variables:
//! - SWOOP_ROLE_ARN: role to assume (required)
//! - SWOOP_SESSION_NAME: role session name (required)
//! - AWS_REGION / AWS_DEFAULT_REGION: region (required)
//! - SWOOP_TTL_SECONDS: credential lifetime (default: 900)
//! - AWS_PROFILE: profile used to find the calling identity
//! - SWOOP_ENDPOINT: STS endpoint override (e.g. LocalStack)

use std::env;
use swoop::{AutoRefreshableSession, RefreshConfig};

#[tokio::main]
async fn main() -> swoop::Result<()> {
    println!("=== Environment-Based Configuration Example ===\n");

    println!("Environment configuration:");
    for key in [
        "SWOOP_ROLE_ARN",
        "SWOOP_SESSION_NAME",
        "AWS_REGION",
        "SWOOP_TTL_SECONDS",
        "AWS_PROFILE",
        "SWOOP_ENDPOINT",
    ] {
        println!(
            "  {}: {}",
            key,
            env::var(key).unwrap_or_else(|_| "(not set)".to_string())
        );
    }

    let config = match RefreshConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("\n✗ {}", e);
            return Ok(());
        }
    };

    println!("\nResolved configuration:");
    println!("  region: {}", config.region);
    println!("  role: {}", config.role_arn);
    println!("  session name: {}", config.session_name);
    println!("  ttl: {}s", config.ttl.as_secs());

    let refresher = AutoRefreshableSession::new(config)?;
    let snapshot = refresher.fetch_credentials().await?;

    println!("\n✓ Assumed role");
    println!("  access key: {}", snapshot.access_key);
    println!("  expires: {}", snapshot.expiry_iso8601());

    Ok(())
}
