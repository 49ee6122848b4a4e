//! Model Context Protocol (MCP) adapter: memory tools served over stdio.

pub mod server;

use rmcp::ServiceExt;
use thiserror::Error;
use tracing::info;

pub use server::MemoryMcpServer;

/// Failure while running the MCP server.
#[derive(Error, Debug)]
pub enum McpServeError {
    #[error("MCP initialization failed: {0}")]
    Initialize(String),

    #[error("MCP server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Serve `server` over stdin/stdout until the client disconnects.
pub async fn serve_stdio(server: MemoryMcpServer) -> Result<(), McpServeError> {
    info!(collection = %server.collection(), "starting DeltaMemory MCP server on stdio");

    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| McpServeError::Initialize(e.to_string()))?;
    info!("MCP server running, waiting for client");

    let reason = running.waiting().await?;
    info!(?reason, "MCP server shut down");
    Ok(())
}
