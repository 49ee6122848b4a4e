//! Per-call options for the protocol client.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::memory::{MemoryType, Metadata};
use super::recall::RecallWeights;

/// Options for `ingest`.
///
/// ```
/// use deltamemory::types::IngestOptions;
///
/// let options = IngestOptions::builder()
///     .collection("hello-world")
///     .speaker("user")
///     .build();
/// assert_eq!(options.speaker.as_deref(), Some("user"));
/// ```
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
pub struct IngestOptions {
    #[builder(into)]
    pub collection: Option<String>,
    pub metadata: Option<Metadata>,
    /// When the content was created (ISO 8601).
    #[builder(into)]
    pub datetime: Option<String>,
    /// Speaker identifier for conversation content.
    #[builder(into)]
    pub speaker: Option<String>,
}

/// Options for `recall`.
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
pub struct RecallOptions {
    #[builder(into)]
    pub collection: Option<String>,
    /// Maximum number of results; the server default applies when unset.
    pub limit: Option<u32>,
    pub weights: Option<RecallWeights>,
    pub memory_types: Option<Vec<MemoryType>>,
}

/// Options for raw `store`.
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
pub struct StoreOptions {
    #[builder(into)]
    pub collection: Option<String>,
    pub memory_type: Option<MemoryType>,
    pub metadata: Option<Metadata>,
}
