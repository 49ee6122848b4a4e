//! MCP registered-tool adapter.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde::Serialize;
use tracing::warn;

use crate::adapter::capability::{Capability, Operation};
use crate::adapter::dispatch::{invoke, InvocationScope, OperationOutput};
use crate::client::DeltaMemory;
use crate::collection::{CollectionName, TenantScope};
use crate::tools::ToolArguments;

const INSTRUCTIONS: &str = "DeltaMemory gives you long-term cognitive memory. \
    Use deltamemory_recall before answering questions about the user or past \
    conversations, and deltamemory_ingest to remember information worth keeping.";

/// MCP server exposing every capability as a `deltamemory_*` tool.
///
/// All calls target the collection fixed at construction; no tool accepts
/// a collection argument.
#[derive(Debug, Clone)]
pub struct MemoryMcpServer {
    client: Arc<DeltaMemory>,
    scope: InvocationScope,
}

impl MemoryMcpServer {
    pub fn new(client: Arc<DeltaMemory>, collection: CollectionName) -> Self {
        let scope = InvocationScope::builder().collection(collection).build();
        Self { client, scope }
    }

    /// Serve one tenant's collection, tagging ingests with the tenant id.
    pub fn for_tenant(client: Arc<DeltaMemory>, tenant: &TenantScope) -> Self {
        let scope = InvocationScope::builder()
            .collection(tenant.collection().clone())
            .tenant(tenant.tenant().clone())
            .build();
        Self { client, scope }
    }

    pub fn collection(&self) -> &CollectionName {
        self.scope.collection()
    }

    /// Registered tools, in catalog order.
    pub fn tool_list(&self) -> Vec<Tool> {
        Operation::all()
            .map(|op| registered_tool(op.capability()))
            .collect()
    }

    /// Run a tool call. Operation failures are returned as error results;
    /// only an unknown tool name is a protocol error.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let operation = name
            .strip_prefix(crate::adapter::capability::MCP_TOOL_PREFIX)
            .and_then(|_| Operation::from_tool_name(name))
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {name}"), None))?;

        let args = ToolArguments::new(arguments.map(serde_json::Value::Object).unwrap_or_default());
        match invoke(&self.client, &self.scope, operation.capability(), &args).await {
            Ok(output) => Ok(CallToolResult::success(vec![Content::text(render(&output))])),
            Err(err) => {
                warn!(
                    tool = name,
                    collection = %self.collection(),
                    error = %err,
                    "MCP tool call failed"
                );
                Ok(CallToolResult::error(vec![Content::text(format!("Error: {err}"))]))
            }
        }
    }
}

fn registered_tool(capability: &Capability) -> Tool {
    let schema = capability
        .mcp_parameters()
        .schema
        .as_object()
        .cloned()
        .unwrap_or_default();
    let mut tool = Tool::new(
        capability.mcp_name(),
        capability.description,
        Arc::new(schema),
    );

    let hints = capability.hints();
    let mut annotations = ToolAnnotations::new();
    annotations.title = Some(capability.title.to_string());
    annotations.read_only_hint = Some(hints.read_only_hint);
    annotations.destructive_hint = Some(hints.destructive_hint);
    annotations.idempotent_hint = Some(hints.idempotent_hint);
    annotations.open_world_hint = Some(hints.open_world_hint);
    tool.annotations = Some(annotations);
    tool
}

fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("<unserializable result: {e}>"))
}

/// Text content returned for a successful call.
pub fn render(output: &OperationOutput) -> String {
    match output {
        OperationOutput::Ingested(result) => pretty(result),
        OperationOutput::Recalled(result) => match result.context.as_deref() {
            Some(context) if !context.is_empty() => context.to_string(),
            _ => pretty(result),
        },
        OperationOutput::Stored(stored) => format!("Stored memory with ID: {}", stored.id),
        OperationOutput::Fetched(memory) => pretty(memory),
        OperationOutput::Deleted { id } => format!("Deleted memory: {id}"),
        OperationOutput::Decayed(r) => format!("Applied decay to {} memories", r.affected_count),
        OperationOutput::Consolidated(r) => {
            format!("Consolidated {} memory groups", r.consolidated_count)
        }
        OperationOutput::Reflected(r) => r.reflection.clone(),
        OperationOutput::Stats(stats) => pretty(stats),
        OperationOutput::Graph(graph) => pretty(graph),
        OperationOutput::Purged(r) => format!("Purged {} memories", r.deleted_count),
        OperationOutput::Health(h) => {
            format!("Server healthy: {}, version: {}", h.healthy, h.version)
        }
    }
}

impl ServerHandler for MemoryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments).await
    }
}
