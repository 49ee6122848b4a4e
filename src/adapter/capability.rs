//! Capability catalog shared by every tool adapter.
//!
//! One descriptor per client operation carries the tool names, the input
//! fields and the side-effect class. Agent-SDK parameter schemas and MCP
//! input schemas and annotations are both generated from it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::tools::AgentToolParameters;

/// Prefix of every MCP tool name.
pub const MCP_TOOL_PREFIX: &str = "deltamemory_";

/// Accepted values of the `importance` ingest argument.
pub const IMPORTANCE_LEVELS: &[&str] = &["low", "medium", "high"];

/// Accepted values of the `memoryType` store argument.
pub const MEMORY_TYPES: &[&str] = &["Conversation", "Fact", "Insight", "Summary"];

/// A protocol client operation exposed as a tool.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Ingest,
    Recall,
    Store,
    Get,
    Delete,
    Decay,
    Consolidate,
    Reflect,
    Stats,
    Graph,
    Purge,
    Health,
}

/// How an operation affects the memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SideEffect {
    /// Reads state, repeatable without change.
    Read,
    /// Reads state but produces new model output each time.
    Generative,
    /// Adds memories; repeating duplicates them.
    Append,
    /// Rewrites salience or merges memories in place.
    Rewrite,
    /// Removes memories; repeating is harmless.
    Destroy,
}

/// Behavior hints published with a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolHints {
    pub read_only_hint: bool,
    pub destructive_hint: bool,
    pub idempotent_hint: bool,
    pub open_world_hint: bool,
}

impl SideEffect {
    pub fn hints(self) -> ToolHints {
        let (read_only, destructive, idempotent) = match self {
            Self::Read => (true, false, true),
            Self::Generative => (true, false, false),
            Self::Append | Self::Rewrite => (false, false, false),
            Self::Destroy => (false, true, true),
        };
        ToolHints {
            read_only_hint: read_only,
            destructive_hint: destructive,
            idempotent_hint: idempotent,
            open_world_hint: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Integer,
    Enum(&'static [&'static str]),
}

/// One input field of a capability.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
    /// Only offered to agent-SDK tools, never to MCP clients.
    pub agent_only: bool,
}

impl ParamSpec {
    const fn agent_only(self) -> Self {
        Self {
            agent_only: true,
            ..self
        }
    }
}

const fn param(
    name: &'static str,
    kind: ParamKind,
    description: &'static str,
    required: bool,
) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        description,
        required,
        agent_only: false,
    }
}

fn schema_for<'a>(params: impl Iterator<Item = &'a ParamSpec>) -> AgentToolParameters {
    params
        .fold(AgentToolParameters::object(), |builder, p| match p.kind {
            ParamKind::String => builder.string(p.name, p.description, p.required),
            ParamKind::Number => builder.number(p.name, p.description, p.required),
            ParamKind::Integer => builder.integer(p.name, p.description, p.required),
            ParamKind::Enum(values) => {
                builder.string_enum(p.name, p.description, values, p.required)
            }
        })
        .build()
}

/// Descriptor of one tool-exposed operation.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    pub operation: Operation,
    /// Agent-SDK tool name.
    pub agent_name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub side_effect: SideEffect,
    pub params: &'static [ParamSpec],
}

impl Capability {
    /// MCP tool name, e.g. `deltamemory_recall`.
    pub fn mcp_name(&self) -> String {
        format!("{MCP_TOOL_PREFIX}{}", self.operation)
    }

    pub fn hints(&self) -> ToolHints {
        self.side_effect.hints()
    }

    /// JSON Schema for the input fields.
    pub fn parameters(&self) -> AgentToolParameters {
        schema_for(self.params.iter())
    }

    /// JSON Schema for MCP clients, without the agent-only fields.
    pub fn mcp_parameters(&self) -> AgentToolParameters {
        schema_for(self.params.iter().filter(|p| !p.agent_only))
    }
}

impl Operation {
    pub fn capability(self) -> &'static Capability {
        // CATALOG is declared in enum order.
        &CATALOG[self as usize]
    }

    pub fn all() -> impl Iterator<Item = Operation> {
        Self::iter()
    }

    /// Look up an operation by agent-SDK or MCP tool name.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::iter().find(|op| {
            let cap = op.capability();
            cap.agent_name == name
                || name
                    .strip_prefix(MCP_TOOL_PREFIX)
                    .is_some_and(|key| key == op.to_string())
        })
    }
}

static CATALOG: [Capability; 12] = [
    Capability {
        operation: Operation::Ingest,
        agent_name: "storeMemory",
        title: "Ingest Memory",
        description: "Store (remember) important user information for future reference. \
            Content is processed to extract facts, concepts, profiles and events. \
            Run when explicitly asked or when the user mentions information that is \
            useful beyond the current conversation.",
        side_effect: SideEffect::Append,
        params: &[
            param(
                "content",
                ParamKind::String,
                "Information to remember (e.g., 'User prefers dark mode and TypeScript')",
                true,
            ),
            param(
                "importance",
                ParamKind::Enum(IMPORTANCE_LEVELS),
                "Importance level of this memory (default: medium)",
                false,
            )
            .agent_only(),
            param(
                "datetime",
                ParamKind::String,
                "When the content was created (ISO 8601)",
                false,
            ),
            param(
                "speaker",
                ParamKind::String,
                "Speaker identifier for conversation content",
                false,
            ),
        ],
    },
    Capability {
        operation: Operation::Recall,
        agent_name: "recallMemory",
        title: "Recall Memories",
        description: "Search (recall) past conversations and user context using hybrid \
            search over similarity, recency and salience. Run when explicitly asked or \
            when context about the user's past choices would be helpful.",
        side_effect: SideEffect::Read,
        params: &[
            param(
                "query",
                ParamKind::String,
                "What to search for in memory (e.g., 'user preferences', 'past meetings')",
                true,
            ),
            param(
                "limit",
                ParamKind::Integer,
                "Maximum number of memories to retrieve",
                false,
            ),
        ],
    },
    Capability {
        operation: Operation::Store,
        agent_name: "rawStoreMemory",
        title: "Store Memory",
        description: "Store content without cognitive processing (raw mode). Use for simple \
            storage without fact extraction.",
        side_effect: SideEffect::Append,
        params: &[
            param("content", ParamKind::String, "Content to store", true),
            param(
                "memoryType",
                ParamKind::Enum(MEMORY_TYPES),
                "Kind of memory (default: Conversation)",
                false,
            ),
        ],
    },
    Capability {
        operation: Operation::Get,
        agent_name: "getMemory",
        title: "Get Memory",
        description: "Retrieve a specific memory by its ID.",
        side_effect: SideEffect::Read,
        params: &[param("id", ParamKind::String, "Memory ID", true)],
    },
    Capability {
        operation: Operation::Delete,
        agent_name: "deleteMemory",
        title: "Delete Memory",
        description: "Delete a memory by its ID. This action is irreversible.",
        side_effect: SideEffect::Destroy,
        params: &[param("id", ParamKind::String, "Memory ID", true)],
    },
    Capability {
        operation: Operation::Decay,
        agent_name: "decayMemories",
        title: "Apply Decay",
        description: "Apply salience decay to memories. Reduces the importance of older \
            memories over time.",
        side_effect: SideEffect::Rewrite,
        params: &[param(
            "rate",
            ParamKind::Number,
            "Decay rate (default: 0.1)",
            false,
        )],
    },
    Capability {
        operation: Operation::Consolidate,
        agent_name: "consolidateMemories",
        title: "Consolidate Memories",
        description: "Merge similar memories to reduce redundancy and improve recall quality.",
        side_effect: SideEffect::Rewrite,
        params: &[param(
            "threshold",
            ParamKind::Number,
            "Similarity threshold (default: 0.8)",
            false,
        )],
    },
    Capability {
        operation: Operation::Reflect,
        agent_name: "reflectOnMemories",
        title: "Generate Reflection",
        description: "Generate insights from recent memories. Useful for summarizing \
            patterns and key information.",
        side_effect: SideEffect::Generative,
        params: &[param(
            "windowSize",
            ParamKind::Integer,
            "Number of recent memories to consider (default: 10)",
            false,
        )],
    },
    Capability {
        operation: Operation::Stats,
        agent_name: "memoryStats",
        title: "Collection Stats",
        description: "Get statistics for the memory collection: memories, facts, concepts, \
            profiles and events.",
        side_effect: SideEffect::Read,
        params: &[],
    },
    Capability {
        operation: Operation::Graph,
        agent_name: "memoryGraph",
        title: "Get Knowledge Graph",
        description: "Retrieve the knowledge graph with concepts and their relationships.",
        side_effect: SideEffect::Read,
        params: &[],
    },
    Capability {
        operation: Operation::Purge,
        agent_name: "purgeMemories",
        title: "Purge Collection",
        description: "Delete ALL memories in the collection. This action is irreversible. \
            Use with extreme caution.",
        side_effect: SideEffect::Destroy,
        params: &[],
    },
    Capability {
        operation: Operation::Health,
        agent_name: "memoryHealth",
        title: "Health Check",
        description: "Check DeltaMemory server health and version.",
        side_effect: SideEffect::Read,
        params: &[],
    },
];
