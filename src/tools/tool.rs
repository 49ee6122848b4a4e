//! Tool trait.

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::error::ToolError;
use super::types::AgentToolParameters;

/// Context available during tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    /// Host-supplied metadata (conversation id, request id, ...).
    pub metadata: serde_json::Value,
}

/// A callable tool as seen by an agent-SDK host loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &AgentToolParameters;

    /// Whether calling the tool leaves the memory store unchanged.
    ///
    /// Hosts may run read-only calls concurrently or without confirmation.
    fn read_only(&self) -> bool {
        false
    }

    /// Execute the tool with parsed arguments.
    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ToolError>;
}
