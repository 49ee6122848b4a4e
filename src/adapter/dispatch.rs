//! Shared invocation path for every tool adapter.
//!
//! `invoke` drives one call through the lifecycle: arguments are validated
//! and parsed (`InputReceived`), exactly one protocol client method runs
//! (`Executing`), and the typed output or error is handed back to the
//! adapter for shaping.

use std::str::FromStr;

use bon::Builder;
use chrono::{SecondsFormat, Utc};
use tracing::debug;

use super::capability::{Capability, Operation};
use super::record::ToolCallPhase;
use crate::client::DeltaMemory;
use crate::collection::{CollectionName, TenantId};
use crate::tools::{validate_arguments, ToolArguments, ToolError};
use crate::types::*;

/// Importance recorded when a store call does not specify one.
pub const DEFAULT_IMPORTANCE: &str = "medium";

/// Everything an adapter fixes at construction time.
///
/// Every call made through a scope targets its one collection; tool
/// arguments can never name another.
#[derive(Debug, Clone, Builder)]
pub struct InvocationScope {
    collection: CollectionName,
    tenant: Option<TenantId>,
    #[builder(default)]
    metadata: Metadata,
    /// Recall limit when the caller omits one; `None` uses the client default.
    recall_limit: Option<u32>,
    /// Add `importance` and `timestamp` to ingest metadata.
    #[builder(default)]
    stamp_ingests: bool,
}

impl InvocationScope {
    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    pub fn tenant(&self) -> Option<&TenantId> {
        self.tenant.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Parsed, validated arguments for one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    Ingest {
        content: String,
        importance: String,
        datetime: Option<String>,
        speaker: Option<String>,
    },
    Recall {
        query: String,
        limit: Option<u32>,
    },
    Store {
        content: String,
        memory_type: MemoryType,
    },
    Get {
        id: String,
    },
    Delete {
        id: String,
    },
    Decay {
        rate: Option<f64>,
    },
    Consolidate {
        threshold: Option<f64>,
    },
    Reflect {
        window_size: Option<u32>,
    },
    Stats,
    Graph,
    Purge,
    Health,
}

impl OperationRequest {
    /// Parse arguments for `operation`. Assumes schema validation passed.
    pub fn parse(operation: Operation, args: &ToolArguments) -> Result<Self, ToolError> {
        let text = |key: &str| args.get_str(key).map(str::to_string);
        let opt_text = |key: &str| args.get_str_opt(key).map(str::to_string);

        Ok(match operation {
            Operation::Ingest => Self::Ingest {
                content: text("content")?,
                importance: args
                    .get_str_opt("importance")
                    .unwrap_or(DEFAULT_IMPORTANCE)
                    .to_string(),
                datetime: opt_text("datetime"),
                speaker: opt_text("speaker"),
            },
            Operation::Recall => Self::Recall {
                query: text("query")?,
                limit: args.get_u32_opt("limit")?,
            },
            Operation::Store => Self::Store {
                content: text("content")?,
                memory_type: match args.get_str_opt("memoryType") {
                    Some(raw) => MemoryType::from_str(raw).map_err(|_| {
                        ToolError::InvalidArguments(format!("Unknown memory type: {raw}"))
                    })?,
                    None => MemoryType::default(),
                },
            },
            Operation::Get => Self::Get { id: text("id")? },
            Operation::Delete => Self::Delete { id: text("id")? },
            Operation::Decay => Self::Decay {
                rate: args.get_f64_opt("rate")?,
            },
            Operation::Consolidate => Self::Consolidate {
                threshold: args.get_f64_opt("threshold")?,
            },
            Operation::Reflect => Self::Reflect {
                window_size: args.get_u32_opt("windowSize")?,
            },
            Operation::Stats => Self::Stats,
            Operation::Graph => Self::Graph,
            Operation::Purge => Self::Purge,
            Operation::Health => Self::Health,
        })
    }
}

/// Typed result of one operation, before adapter-specific shaping.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Ingested(IngestResult),
    Recalled(RecallResult),
    Stored(StoreResponse),
    Fetched(Memory),
    Deleted { id: String },
    Decayed(DecayResponse),
    Consolidated(ConsolidateResponse),
    Reflected(ReflectResponse),
    Stats(CollectionStats),
    Graph(GraphResponse),
    Purged(PurgeResponse),
    Health(HealthStatus),
}

struct PhaseTracker<'a> {
    phase: ToolCallPhase,
    capability: &'a Capability,
    collection: &'a str,
}

impl PhaseTracker<'_> {
    fn advance(&mut self, next: ToolCallPhase) {
        debug_assert!(self.phase.can_transition_to(next));
        debug!(
            operation = %self.capability.operation,
            collection = self.collection,
            from = ?self.phase,
            to = ?next,
            "tool call phase"
        );
        self.phase = next;
    }
}

/// Run one tool call against `client` within `scope`.
pub async fn invoke(
    client: &DeltaMemory,
    scope: &InvocationScope,
    capability: &Capability,
    args: &ToolArguments,
) -> Result<OperationOutput, ToolError> {
    let mut tracker = PhaseTracker {
        phase: ToolCallPhase::Idle,
        capability,
        collection: scope.collection.as_str(),
    };

    tracker.advance(ToolCallPhase::InputReceived);
    let request = validate_arguments(args.raw(), &capability.parameters().schema)
        .and_then(|()| OperationRequest::parse(capability.operation, args));
    let request = match request {
        Ok(request) => request,
        Err(err) => {
            tracker.advance(ToolCallPhase::Failed);
            return Err(err);
        }
    };

    tracker.advance(ToolCallPhase::Executing);
    let result = execute(client, scope, request).await;
    let next = match result {
        Ok(_) => ToolCallPhase::Succeeded,
        Err(_) => ToolCallPhase::Failed,
    };
    tracker.advance(next);
    result.map_err(ToolError::from)
}

async fn execute(
    client: &DeltaMemory,
    scope: &InvocationScope,
    request: OperationRequest,
) -> crate::error::Result<OperationOutput> {
    let collection = Some(scope.collection.as_str());

    Ok(match request {
        OperationRequest::Ingest {
            content,
            importance,
            datetime,
            speaker,
        } => {
            let mut metadata = scope.metadata.clone();
            if let Some(tenant) = &scope.tenant {
                metadata.insert("userId".into(), tenant.to_string());
            }
            if scope.stamp_ingests {
                let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
                metadata.insert("importance".into(), importance);
                metadata.insert("timestamp".into(), timestamp);
            }
            let options = IngestOptions {
                collection: collection.map(str::to_string),
                metadata: Some(metadata),
                datetime,
                speaker,
            };
            OperationOutput::Ingested(client.ingest(&content, options).await?)
        }
        OperationRequest::Recall { query, limit } => {
            let options = RecallOptions {
                collection: collection.map(str::to_string),
                limit: limit.or(scope.recall_limit),
                ..Default::default()
            };
            OperationOutput::Recalled(client.recall(&query, options).await?)
        }
        OperationRequest::Store {
            content,
            memory_type,
        } => {
            let options = StoreOptions {
                collection: collection.map(str::to_string),
                memory_type: Some(memory_type),
                metadata: Some(scope.metadata.clone()),
            };
            OperationOutput::Stored(client.store(&content, options).await?)
        }
        OperationRequest::Get { id } => {
            OperationOutput::Fetched(client.get(&id, collection).await?)
        }
        OperationRequest::Delete { id } => {
            client.delete(&id, collection).await?;
            OperationOutput::Deleted { id }
        }
        OperationRequest::Decay { rate } => {
            OperationOutput::Decayed(client.decay(rate, collection).await?)
        }
        OperationRequest::Consolidate { threshold } => {
            OperationOutput::Consolidated(client.consolidate(threshold, collection).await?)
        }
        OperationRequest::Reflect { window_size } => {
            OperationOutput::Reflected(client.reflect(window_size, collection).await?)
        }
        OperationRequest::Stats => OperationOutput::Stats(client.stats(collection).await?),
        OperationRequest::Graph => OperationOutput::Graph(client.graph(collection).await?),
        OperationRequest::Purge => OperationOutput::Purged(client.purge(collection).await?),
        OperationRequest::Health => OperationOutput::Health(client.health().await?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(op: Operation, args: serde_json::Value) -> Result<OperationRequest, ToolError> {
        OperationRequest::parse(op, &ToolArguments::new(args))
    }

    #[test]
    fn ingest_defaults_importance_to_medium() {
        let request = parse(Operation::Ingest, json!({ "content": "likes tea" })).unwrap();
        assert_eq!(
            request,
            OperationRequest::Ingest {
                content: "likes tea".into(),
                importance: "medium".into(),
                datetime: None,
                speaker: None,
            }
        );
    }

    #[test]
    fn store_parses_memory_type() {
        let args = json!({ "content": "x", "memoryType": "Insight" });
        let request = parse(Operation::Store, args).unwrap();
        assert_eq!(
            request,
            OperationRequest::Store {
                content: "x".into(),
                memory_type: MemoryType::Insight,
            }
        );
        let args = json!({ "content": "x", "memoryType": "Dream" });
        assert!(parse(Operation::Store, args).is_err());
    }

    #[test]
    fn numeric_arguments_are_optional() {
        let decay = parse(Operation::Decay, json!({})).unwrap();
        assert_eq!(decay, OperationRequest::Decay { rate: None });
        let reflect = parse(Operation::Reflect, json!({ "windowSize": 3 })).unwrap();
        let expected = OperationRequest::Reflect {
            window_size: Some(3),
        };
        assert_eq!(reflect, expected);
    }

    #[test]
    fn collection_argument_is_ignored() {
        let request = parse(Operation::Purge, json!({ "collection": "someone-else" })).unwrap();
        assert_eq!(request, OperationRequest::Purge);
    }

    #[test]
    fn scope_builder_defaults_metadata() {
        let scope = InvocationScope::builder()
            .collection(CollectionName::new("user-alice").unwrap())
            .build();
        assert!(scope.metadata().is_empty());
        assert!(scope.tenant().is_none());
        assert!(!scope.stamp_ingests);
        assert_eq!(scope.collection().as_str(), "user-alice");
    }
}
