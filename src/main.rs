//! Keyshare - ephemeral in-memory key sharing

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyshare::{config::Args, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("keyshare={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Keyshare - ephemeral key sharing");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Key TTL: {}s", args.key_ttl_secs);
    info!("Expiry policy: {}", args.expiry_policy.as_str());
    info!("Max body: {} bytes", args.max_body_bytes);
    info!("======================================");

    let state = Arc::new(server::AppState::new(args));
    server::run(state).await?;

    Ok(())
}
