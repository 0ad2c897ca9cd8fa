//! mcp-covers server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use coverfind_client::CoverPipeline;
use coverfind_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let pipeline = CoverPipeline::from_config(&config)?;

    tracing::info!(covers_dir = %config.covers_dir.display(), "Starting mcp-covers server on stdio transport");

    let handler = handler::CoverServer::new(pipeline, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
