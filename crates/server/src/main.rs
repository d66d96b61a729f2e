//! Sentiment service entry point.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use server::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    server::serve(config).await
}
