//! Stored memory values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Metadata key-value pairs attached to a memory.
pub type Metadata = HashMap<String, String>;

/// Kind of a stored memory.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
pub enum MemoryType {
    #[default]
    Conversation,
    Fact,
    Insight,
    Summary,
}

/// One stored unit of content, as returned by the server.
///
/// Read-through value: salience changes only server-side (decay), so a
/// `Memory` is a snapshot and is never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    pub id: String,
    pub collection: String,
    pub content: String,
    pub memory_type: MemoryType,
    pub salience: f64,
    pub timestamp: i64,
    #[serde(default)]
    pub metadata: Metadata,
}
