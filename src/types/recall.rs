//! Recall (hybrid search) results.

use serde::{Deserialize, Serialize};

use super::memory::Memory;

/// Optional weight hints for the server's cognitive score.
///
/// The client never computes the score itself; unset weights fall back to
/// the server's defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RecallWeights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salience: Option<f64>,
}

/// A memory with its ranking components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryResult {
    pub memory: Memory,
    pub similarity: f64,
    pub recency: f64,
    pub salience: f64,
    pub cognitive_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConceptRelation {
    pub target_name: String,
    pub relation_type: String,
    pub weight: f64,
}

/// A concept matched by the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConceptResult {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub concept_type: Option<String>,
    pub relevance: f64,
    #[serde(default)]
    pub relations: Vec<ConceptRelation>,
}

/// Knowledge derived from multi-hop graph traversal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphKnowledge {
    /// Path through the graph, e.g. `hotel -[has]-> check-in time`.
    pub path: String,
    pub statement: String,
    pub confidence: f64,
    pub hops: u32,
    pub source_concept: String,
}

/// Structured fact about the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub topic: String,
    pub sub_topic: String,
    pub content: String,
    pub confidence: f64,
    pub updated_at: i64,
}

/// Timeline entry about the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEvent {
    pub id: String,
    pub gist: String,
    pub event_type: String,
    pub mentioned_at: i64,
    #[serde(default)]
    pub event_at: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Response of `recall`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecallResult {
    pub results: Vec<MemoryResult>,
    #[serde(default)]
    pub concepts: Vec<ConceptResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_knowledge: Option<Vec<GraphKnowledge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<UserProfile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<UserEvent>>,
    /// Pre-formatted context string for LLM consumption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl RecallResult {
    /// Highest-ranked memory, if any.
    pub fn top(&self) -> Option<&Memory> {
        self.results.first().map(|r| &r.memory)
    }
}
