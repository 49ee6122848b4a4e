//! Agent-SDK tool adapter.
//!
//! [`MemoryTools`] turns a shared [`DeltaMemory`] client into tools an LLM
//! host loop can register. Each instance is bound to one tenant collection
//! when it is built, and tool results are always JSON objects with a
//! `success` flag: failures are reported to the model, never raised.

use std::sync::Arc;

use async_trait::async_trait;
use bon::Builder;
use futures::future::join_all;
use serde_json::{json, Value};
use tracing::warn;

use super::capability::Operation;
use super::dispatch::{invoke, InvocationScope, OperationOutput};
use super::record::ToolCallRecord;
use crate::client::DeltaMemory;
use crate::collection::{CollectionError, CollectionName, CollectionPrefix, TenantId, TenantScope};
use crate::tools::{
    DynamicTool, DynamicToolAdapter, DynamicToolProvider, Tool, ToolArguments, ToolError,
    ToolExecutionContext,
};
use crate::types::Metadata;

/// Recall limit used when the model does not pass one.
pub const DEFAULT_AGENT_RECALL_LIMIT: u32 = 5;

/// Context string returned when recall finds nothing.
pub const NO_MEMORIES_CONTEXT: &str = "No relevant memories found.";

/// Settings for [`MemoryTools`].
///
/// ```
/// use deltamemory::adapter::MemoryToolsConfig;
/// use deltamemory::collection::CollectionPrefix;
///
/// let config = MemoryToolsConfig::builder()
///     .tenant_id("user123")
///     .prefix(CollectionPrefix::LifeCoach)
///     .build();
/// assert_eq!(config.tenant_id, "user123");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct MemoryToolsConfig {
    /// End-user, case or session id that owns the memories.
    #[builder(into)]
    pub tenant_id: String,
    #[builder(default)]
    pub prefix: CollectionPrefix,
    /// Attached to every ingested memory.
    #[builder(default)]
    pub metadata: Metadata,
    /// Operations exposed as tools.
    #[builder(default = vec![Operation::Recall, Operation::Ingest])]
    pub operations: Vec<Operation>,
}

/// Memory tools for one tenant.
#[derive(Debug, Clone)]
pub struct MemoryTools {
    client: Arc<DeltaMemory>,
    tenant: TenantScope,
    scope: InvocationScope,
    operations: Vec<Operation>,
}

impl MemoryTools {
    /// Bind `client` to the collection `<prefix>-<tenant_id>`.
    pub fn new(
        client: Arc<DeltaMemory>,
        config: MemoryToolsConfig,
    ) -> Result<Self, CollectionError> {
        let tenant = TenantScope::new(config.prefix, TenantId::new(config.tenant_id)?)?;
        let scope = InvocationScope::builder()
            .collection(tenant.collection().clone())
            .tenant(tenant.tenant().clone())
            .metadata(config.metadata)
            .recall_limit(DEFAULT_AGENT_RECALL_LIMIT)
            .stamp_ingests(true)
            .build();

        let mut operations = Vec::with_capacity(config.operations.len());
        for op in config.operations {
            if !operations.contains(&op) {
                operations.push(op);
            }
        }

        Ok(Self {
            client,
            tenant,
            scope,
            operations,
        })
    }

    /// Shorthand for the default `recallMemory` and `storeMemory` tools.
    pub fn for_tenant(
        client: Arc<DeltaMemory>,
        tenant_id: impl Into<String>,
    ) -> Result<Self, CollectionError> {
        let config = MemoryToolsConfig::builder().tenant_id(tenant_id).build();
        Self::new(client, config)
    }

    pub fn collection(&self) -> &CollectionName {
        self.tenant.collection()
    }

    pub fn tenant(&self) -> &TenantScope {
        &self.tenant
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.operations
            .iter()
            .map(|op| op.capability().agent_name)
            .collect()
    }

    /// Tool descriptors, in registration order.
    pub fn definitions(&self) -> Vec<DynamicTool> {
        self.operations
            .iter()
            .map(|op| {
                let cap = op.capability();
                DynamicTool {
                    name: cap.agent_name.to_string(),
                    description: cap.description.to_string(),
                    parameters: cap.parameters(),
                    read_only: cap.hints().read_only_hint,
                }
            })
            .collect()
    }

    /// Tools ready for a host loop's tool registry.
    pub fn tools(self: &Arc<Self>) -> Vec<Arc<dyn Tool>> {
        let provider: Arc<dyn DynamicToolProvider> = self.clone();
        self.definitions()
            .into_iter()
            .map(|def| Arc::new(DynamicToolAdapter::new(provider.clone(), def)) as Arc<dyn Tool>)
            .collect()
    }

    fn resolve(&self, name: &str) -> Result<Operation, ToolError> {
        self.operations
            .iter()
            .copied()
            .find(|op| op.capability().agent_name == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Invoke a tool by name and return the shaped result.
    ///
    /// Never fails: any error becomes `{ "success": false, "error": ... }`.
    pub async fn invoke(&self, name: &str, args: Value) -> Value {
        let result = match self.resolve(name) {
            Ok(op) => {
                let args = ToolArguments::new(args);
                invoke(&self.client, &self.scope, op.capability(), &args).await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(output) => shape(&output),
            Err(err) => {
                warn!(
                    tool = name,
                    collection = %self.collection(),
                    error = %err,
                    "memory tool call failed"
                );
                failure(&err)
            }
        }
    }

    /// Invoke a tool and return a completed [`ToolCallRecord`].
    pub async fn invoke_recorded(&self, name: &str, args: Value) -> ToolCallRecord {
        let record = ToolCallRecord::begin(name, args.clone());
        let result = self.invoke(name, args).await;
        record.complete(result)
    }

    /// Invoke several tool calls concurrently, returning records in call order.
    pub async fn invoke_all<I, S>(&self, calls: I) -> Vec<ToolCallRecord>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let calls: Vec<(S, Value)> = calls.into_iter().collect();
        let pending = calls
            .iter()
            .map(|(name, args)| self.invoke_recorded(name.as_ref(), args.clone()));
        join_all(pending).await
    }
}

#[async_trait]
impl DynamicToolProvider for MemoryTools {
    async fn list_tools(&self) -> Result<Vec<DynamicTool>, ToolError> {
        Ok(self.definitions())
    }

    async fn execute_tool(
        &self,
        name: &str,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<Value, ToolError> {
        Ok(self.invoke(name, args.raw().clone()).await)
    }
}

fn failure(err: &ToolError) -> Value {
    json!({ "success": false, "error": err.to_string() })
}

/// Reduce an operation output to the token-efficient payload the model sees.
pub fn shape(output: &OperationOutput) -> Value {
    match output {
        OperationOutput::Recalled(result) => {
            let profiles: Vec<Value> = result
                .profiles
                .iter()
                .flatten()
                .map(|p| {
                    json!({
                        "topic": p.topic,
                        "subTopic": p.sub_topic,
                        "content": p.content,
                        "confidence": p.confidence,
                    })
                })
                .collect();
            let events: Vec<Value> = result
                .events
                .iter()
                .flatten()
                .map(|e| json!({ "gist": e.gist, "type": e.event_type, "tags": e.tags }))
                .collect();
            let context = result
                .context
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or(NO_MEMORIES_CONTEXT);
            json!({
                "success": true,
                "profiles": profiles,
                "events": events,
                "context": context,
                "memoryCount": result.results.len(),
            })
        }
        OperationOutput::Ingested(result) => {
            let facts: Vec<&str> = result.facts.iter().map(|f| f.fact.as_str()).collect();
            let concepts: Vec<&str> = result.concepts.iter().map(|c| c.name.as_str()).collect();
            json!({
                "success": true,
                "memoryIds": result.memory_ids,
                "extractedFacts": facts,
                "extractedConcepts": concepts,
            })
        }
        OperationOutput::Stored(stored) => json!({ "success": true, "id": stored.id }),
        OperationOutput::Fetched(memory) => json!({
            "success": true,
            "memory": {
                "id": memory.id,
                "content": memory.content,
                "memoryType": memory.memory_type.to_string(),
                "salience": memory.salience,
                "timestamp": memory.timestamp,
                "metadata": memory.metadata,
            },
        }),
        OperationOutput::Deleted { id } => json!({ "success": true, "deletedId": id }),
        OperationOutput::Decayed(r) => {
            json!({ "success": true, "affectedCount": r.affected_count })
        }
        OperationOutput::Consolidated(r) => {
            json!({ "success": true, "consolidatedCount": r.consolidated_count })
        }
        OperationOutput::Reflected(r) => json!({ "success": true, "reflection": r.reflection }),
        OperationOutput::Stats(s) => json!({
            "success": true,
            "memoryCount": s.memory_count,
            "factCount": s.fact_count,
            "conceptCount": s.concept_count,
            "relationCount": s.relation_count,
            "vectorCount": s.vector_count,
            "profileCount": s.profile_count,
            "eventCount": s.event_count,
        }),
        OperationOutput::Graph(graph) => {
            let nodes: Vec<Value> = graph
                .nodes
                .iter()
                .map(|n| json!({ "id": n.id, "name": n.name, "type": n.node_type }))
                .collect();
            let edges: Vec<Value> = graph
                .edges
                .iter()
                .map(|e| {
                    json!({
                        "from": e.from,
                        "to": e.to,
                        "relationType": e.relation_type,
                        "weight": e.weight,
                    })
                })
                .collect();
            json!({
                "success": true,
                "nodeCount": nodes.len(),
                "edgeCount": edges.len(),
                "nodes": nodes,
                "edges": edges,
            })
        }
        OperationOutput::Purged(r) => json!({ "success": true, "deletedCount": r.deleted_count }),
        OperationOutput::Health(h) => {
            json!({ "success": true, "healthy": h.healthy, "version": h.version })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::types::*;
    use pretty_assertions::assert_eq;

    fn client() -> Arc<DeltaMemory> {
        Arc::new(DeltaMemory::new(ClientConfig::default()).unwrap())
    }

    #[test]
    fn default_tools_are_recall_and_store() {
        let tools = MemoryTools::for_tenant(client(), "alice").unwrap();
        assert_eq!(tools.tool_names(), vec!["recallMemory", "storeMemory"]);
        assert_eq!(tools.collection().as_str(), "user-alice");
    }

    #[test]
    fn tenant_with_separator_is_rejected() {
        let err = MemoryTools::for_tenant(client(), "user-123").unwrap_err();
        assert_eq!(err, CollectionError::TenantContainsSeparator("user-123".into()));
    }

    #[test]
    fn duplicate_operations_are_registered_once() {
        let config = MemoryToolsConfig::builder()
            .tenant_id("bob")
            .operations(vec![Operation::Stats, Operation::Stats, Operation::Purge])
            .build();
        let tools = MemoryTools::new(client(), config).unwrap();
        assert_eq!(tools.tool_names(), vec!["memoryStats", "purgeMemories"]);
    }

    #[tokio::test]
    async fn unregistered_tool_reports_failure() {
        let tools = MemoryTools::for_tenant(client(), "alice").unwrap();
        let result = tools.invoke("purgeMemories", json!({})).await;
        assert_eq!(result, json!({ "success": false, "error": "Unknown tool: purgeMemories" }));
    }

    #[test]
    fn recall_shape_falls_back_to_placeholder_context() {
        let shaped = shape(&OperationOutput::Recalled(RecallResult::default()));
        assert_eq!(
            shaped,
            json!({
                "success": true,
                "profiles": [],
                "events": [],
                "context": NO_MEMORIES_CONTEXT,
                "memoryCount": 0,
            })
        );
    }

    #[test]
    fn ingest_shape_lists_fact_and_concept_names() {
        let shaped = shape(&OperationOutput::Ingested(IngestResult {
            memory_ids: vec!["m1".into()],
            facts: vec![ExtractedFact {
                fact: "User loves Rust".into(),
                confidence: 0.9,
            }],
            concepts: vec![ExtractedConcept {
                name: "rust".into(),
                concept_type: "language".into(),
                importance: 0.7,
            }],
        }));
        assert_eq!(
            shaped,
            json!({
                "success": true,
                "memoryIds": ["m1"],
                "extractedFacts": ["User loves Rust"],
                "extractedConcepts": ["rust"],
            })
        );
    }
}
