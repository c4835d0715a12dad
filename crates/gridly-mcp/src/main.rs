//! Gridly MCP Server
//!
//! Model Context Protocol server exposing the Gridly REST API (projects,
//! databases, grids, views, columns, dependencies and records) to LLM agents
//! over stdio.

use clap::Parser;
use gridly_client::{ClientConfig, GridlyClient, DEFAULT_BASE_URL};
use gridly_mcp::server::GridlyMcpServer;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gridly-mcp", version, about = "MCP server for the Gridly API")]
struct Cli {
    /// Gridly API base URL
    #[arg(long, env = "GRIDLY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gridly_mcp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?.with_base_url(cli.base_url);
    let client = GridlyClient::from_config(config)?;
    let server = GridlyMcpServer::new(client)?;

    tracing::info!(
        tools = server.registry().len(),
        "gridly-mcp starting (stdio transport)"
    );

    let transport = rmcp::transport::io::stdio();
    let service = server.serve(transport).await?;
    service.waiting().await?;

    Ok(())
}
