//! Serve command: run the MCP server on stdio.

use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use quillgate_core::config::Config;

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Serve MCP tools over stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    info!("starting MCP server on stdio");

    let language = config.language().to_string();
    let server =
        ProjectServer::new().with_settings(config.scoring, language, max_input_bytes);
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    info!("MCP server stopped");
    Ok(())
}
