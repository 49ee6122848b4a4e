//! Tools backed by a provider that lists and executes them by name.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::error::ToolError;
use super::tool::{Tool, ToolExecutionContext};
use super::types::AgentToolParameters;

/// A tool descriptor offered by a provider.
#[derive(Debug, Clone)]
pub struct DynamicTool {
    pub name: String,
    pub description: String,
    pub parameters: AgentToolParameters,
    pub read_only: bool,
}

#[async_trait]
pub trait DynamicToolProvider: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, ToolError>;

    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ToolError>;
}

/// One provider tool registered as a standalone [`Tool`].
pub struct DynamicToolAdapter {
    provider: Arc<dyn DynamicToolProvider>,
    tool: DynamicTool,
}

impl DynamicToolAdapter {
    pub fn new(provider: Arc<dyn DynamicToolProvider>, tool: DynamicTool) -> Self {
        Self { provider, tool }
    }

    /// Wrap every tool `provider` currently lists.
    pub async fn from_provider(
        provider: Arc<dyn DynamicToolProvider>,
    ) -> Result<Vec<Self>, ToolError> {
        let tools = provider.list_tools().await?;
        Ok(tools
            .into_iter()
            .map(|tool| Self::new(provider.clone(), tool))
            .collect())
    }
}

impl std::fmt::Debug for DynamicToolAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicToolAdapter")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for DynamicToolAdapter {
    fn name(&self) -> &str {
        &self.tool.name
    }

    fn description(&self) -> &str {
        &self.tool.description
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.tool.parameters
    }

    fn read_only(&self) -> bool {
        self.tool.read_only
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, ToolError> {
        self.provider.execute_tool(&self.tool.name, args, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockProvider {
        last_call: Mutex<Option<String>>,
    }

    fn recall_tool() -> DynamicTool {
        DynamicTool {
            name: "recallMemory".into(),
            description: "recall".into(),
            parameters: AgentToolParameters::empty(),
            read_only: true,
        }
    }

    #[async_trait]
    impl DynamicToolProvider for MockProvider {
        async fn list_tools(&self) -> Result<Vec<DynamicTool>, ToolError> {
            Ok(vec![recall_tool()])
        }

        async fn execute_tool(
            &self,
            name: &str,
            _args: &ToolArguments,
            _ctx: &ToolExecutionContext,
        ) -> Result<serde_json::Value, ToolError> {
            *self.last_call.lock().expect("lock should succeed") = Some(name.to_string());
            Ok(serde_json::json!({ "success": true }))
        }
    }

    #[tokio::test]
    async fn adapter_delegates_execute_to_provider() {
        let provider = Arc::new(MockProvider {
            last_call: Mutex::new(None),
        });
        let adapter = DynamicToolAdapter::new(provider.clone(), recall_tool());
        assert!(adapter.read_only());

        let result = adapter
            .execute(
                &ToolArguments::new(serde_json::json!({})),
                &ToolExecutionContext::default(),
            )
            .await
            .expect("execute should succeed");

        assert_eq!(result["success"], true);
        let last_call = provider
            .last_call
            .lock()
            .expect("lock should succeed")
            .clone();
        assert_eq!(last_call.as_deref(), Some("recallMemory"));
    }

    #[tokio::test]
    async fn from_provider_wraps_listed_tools() {
        let provider = Arc::new(MockProvider {
            last_call: Mutex::new(None),
        });
        let tools = DynamicToolAdapter::from_provider(provider)
            .await
            .expect("listing should succeed");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "recallMemory");
    }
}
