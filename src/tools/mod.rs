//! Tool system for function calling.

pub mod arguments;
pub mod dynamic;
pub mod error;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use dynamic::{DynamicTool, DynamicToolAdapter, DynamicToolProvider};
pub use error::ToolError;
pub use tool::{Tool, ToolExecutionContext};
pub use types::{AgentToolParameters, ParameterBuilder};
pub use validation::validate_arguments;
