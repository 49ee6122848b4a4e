//! Tool adapters over the protocol client.
//!
//! [`capability`] is the single catalog both hosts are generated from,
//! [`dispatch`] runs one call through the invocation lifecycle, and
//! [`agent`] exposes the agent-SDK tools. The MCP adapter lives in
//! `crate::mcp` behind the `mcp` feature.

pub mod agent;
pub mod capability;
pub mod dispatch;
pub mod record;

pub use agent::{MemoryTools, MemoryToolsConfig};
pub use capability::{Capability, Operation, SideEffect, ToolHints};
pub use dispatch::{invoke, InvocationScope, OperationOutput, OperationRequest};
pub use record::{ToolCallPhase, ToolCallRecord};
