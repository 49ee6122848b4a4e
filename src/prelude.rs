//! Convenience re-exports for common use.

pub use crate::adapter::{MemoryTools, MemoryToolsConfig, Operation, ToolCallRecord};
pub use crate::client::DeltaMemory;
pub use crate::collection::{CollectionName, CollectionPrefix, TenantId, TenantScope};
pub use crate::config::ClientConfig;
pub use crate::error::{DeltaMemoryError, Result};
pub use crate::tools::{Tool, ToolArguments, ToolExecutionContext};
pub use crate::types::{
    IngestOptions, IngestResult, Memory, MemoryType, RecallOptions, RecallResult, StoreOptions,
};
