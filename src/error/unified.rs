//! Unified error classification and recovery.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Machine-readable error code sent by the DeltaMemory server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MemoryNotFound,
    CollectionNotFound,
    InvalidRequest,
    InvalidApiKey,
    MissingApiKey,
    ProviderError,
    EmbeddingError,
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Authentication,
    NotFound,
    InvalidInput,
    Upstream,
    Unknown,
}

/// JSON error body returned by the server on a non-success status.
///
/// Both fields are optional: proxies and crashed handlers may return an
/// empty or non-JSON body, which parses to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Parse a raw response body, falling back to an empty body.
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub(crate) fn message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }

    pub(crate) fn code(&self) -> &str {
        self.code.as_deref().unwrap_or("UNKNOWN_ERROR")
    }
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckRequest,
    CheckIdentifier,
    IncreaseTimeout,
    ContactSupport,
}
