//! Error types for DeltaMemory.

pub mod unified;

pub use unified::{ErrorBody, ErrorCategory, ErrorCode, RecoverySuggestion};

use thiserror::Error;

const MEMORY_NOT_FOUND_PREFIX: &str = "Memory not found: ";
const COLLECTION_NOT_FOUND_PREFIX: &str = "Collection not found: ";

/// Primary error type for all protocol client operations.
///
/// Server failures are built by [`DeltaMemoryError::from_response`];
/// transport failures (timeout, refused connection, undecodable body) are
/// always [`DeltaMemoryError::Connection`].
#[derive(Error, Debug)]
pub enum DeltaMemoryError {
    #[error("Memory not found: {id}")]
    MemoryNotFound { id: String, status: Option<u16> },

    #[error("Collection not found: {name}")]
    CollectionNotFound { name: String, status: Option<u16> },

    #[error("{message}")]
    InvalidRequest {
        message: String,
        status: Option<u16>,
    },

    #[error("{message}")]
    Unauthorized {
        message: String,
        status: Option<u16>,
    },

    #[error("{message}")]
    ServerUnavailable {
        message: String,
        status: Option<u16>,
    },

    #[error("{message}")]
    Connection {
        message: String,
        /// Set when the request was cancelled by the client-side timer.
        timeout_ms: Option<u64>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    Generic {
        message: String,
        code: String,
        status: Option<u16>,
    },
}

impl DeltaMemoryError {
    /// Map a non-success HTTP response to exactly one error variant.
    ///
    /// Pure and total: every `(status, body)` pair yields a variant, and
    /// unknown codes fall through to [`DeltaMemoryError::Generic`].
    pub fn from_response(status: u16, body: &ErrorBody) -> Self {
        let message = body.message();
        let code = body.code();
        let status_opt = Some(status);

        match code.parse::<ErrorCode>() {
            Ok(ErrorCode::MemoryNotFound) => Self::MemoryNotFound {
                id: message
                    .strip_prefix(MEMORY_NOT_FOUND_PREFIX)
                    .unwrap_or(message)
                    .to_string(),
                status: status_opt,
            },
            Ok(ErrorCode::CollectionNotFound) => Self::CollectionNotFound {
                name: message
                    .strip_prefix(COLLECTION_NOT_FOUND_PREFIX)
                    .unwrap_or(message)
                    .to_string(),
                status: status_opt,
            },
            Ok(ErrorCode::InvalidRequest) => Self::InvalidRequest {
                message: message.to_string(),
                status: status_opt,
            },
            Ok(ErrorCode::InvalidApiKey | ErrorCode::MissingApiKey) => Self::Unauthorized {
                message: message.to_string(),
                status: status_opt,
            },
            Ok(ErrorCode::ProviderError | ErrorCode::EmbeddingError) => Self::ServerUnavailable {
                message: message.to_string(),
                status: status_opt,
            },
            Err(_) if status == 401 => Self::Unauthorized {
                message: message.to_string(),
                status: status_opt,
            },
            Err(_) => Self::Generic {
                message: message.to_string(),
                code: code.to_string(),
                status: status_opt,
            },
        }
    }

    /// Create a connection error for a transport failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            timeout_ms: None,
            source: None,
        }
    }

    /// Create the error raised when the cancellation timer fires.
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Connection {
            message: format!("Request timeout after {timeout_ms}ms"),
            timeout_ms: Some(timeout_ms),
            source: None,
        }
    }

    pub(crate) fn transport(error: reqwest::Error) -> Self {
        Self::Connection {
            message: error.to_string(),
            timeout_ms: None,
            source: Some(Box::new(error)),
        }
    }

    pub(crate) fn decode(error: serde_json::Error) -> Self {
        Self::Connection {
            message: format!("Invalid response body: {error}"),
            timeout_ms: None,
            source: Some(Box::new(error)),
        }
    }

    /// Human-readable message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::MemoryNotFound { .. } | Self::CollectionNotFound { .. } => self.to_string(),
            Self::InvalidRequest { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::ServerUnavailable { message, .. }
            | Self::Connection { message, .. }
            | Self::Generic { message, .. } => message.clone(),
        }
    }

    /// Stable code string for this error.
    pub fn code(&self) -> &str {
        match self {
            Self::MemoryNotFound { .. } => "MEMORY_NOT_FOUND",
            Self::CollectionNotFound { .. } => "COLLECTION_NOT_FOUND",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::ServerUnavailable { .. } => "SERVER_UNAVAILABLE",
            Self::Connection { .. } => "CONNECTION_ERROR",
            Self::Generic { code, .. } => code,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::MemoryNotFound { status, .. }
            | Self::CollectionNotFound { status, .. }
            | Self::InvalidRequest { status, .. }
            | Self::Unauthorized { status, .. }
            | Self::ServerUnavailable { status, .. }
            | Self::Generic { status, .. } => *status,
            Self::Connection { .. } => None,
        }
    }

    /// Whether the client-side timer cancelled the request.
    ///
    /// A timed-out `ingest` or `store` may still have completed on the
    /// server; its outcome is unknown.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Connection { timeout_ms: Some(_), .. })
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Connection { .. } => ErrorCategory::Connection,
            Self::Unauthorized { .. } => ErrorCategory::Authentication,
            Self::MemoryNotFound { .. } | Self::CollectionNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::InvalidRequest { .. } => ErrorCategory::InvalidInput,
            Self::ServerUnavailable { .. } => ErrorCategory::Upstream,
            Self::Generic { .. } => ErrorCategory::Unknown,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Connection | ErrorCategory::Upstream
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::Connection {
                timeout_ms: Some(_),
                ..
            } => RecoverySuggestion::IncreaseTimeout,
            _ => match self.category() {
                ErrorCategory::Connection | ErrorCategory::Upstream => {
                    RecoverySuggestion::RetryWithBackoff
                }
                ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
                ErrorCategory::NotFound => RecoverySuggestion::CheckIdentifier,
                ErrorCategory::InvalidInput => RecoverySuggestion::CheckRequest,
                ErrorCategory::Unknown => RecoverySuggestion::ContactSupport,
            },
        }
    }
}

/// Errors raised while building a client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to read config file {path}: {reason}")]
    File { path: String, reason: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DeltaMemoryError>;
