//! Tool-layer errors.

use thiserror::Error;

use crate::error::DeltaMemoryError;

/// Failure while validating or executing a tool call.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Execution(#[from] DeltaMemoryError),
}
