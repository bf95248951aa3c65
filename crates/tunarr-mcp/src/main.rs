//! tunarr-mcp - MCP stdio server for Tunarr

use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunarr_client::TunarrClient;
use tunarr_mcp::{Config, McpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // stdout carries protocol frames, so all tracing output goes to stderr.
    //
    // Environment variables:
    //   RUST_LOG               - standard env filter (default: "info")
    //   TUNARR_HOST            - base URL of the Tunarr server (required)
    //   TUNARR_TIMEOUT_SECONDS - HTTP request timeout (default: 30)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        host = %config.host,
        timeout_seconds = config.timeout_seconds,
        "Starting Tunarr MCP server"
    );

    let client = TunarrClient::new(config.host.clone(), config.timeout_seconds)?;
    let server = McpServer::new(client, config.host)?;

    server.run(BufReader::new(stdin()), stdout()).await?;
    Ok(())
}
