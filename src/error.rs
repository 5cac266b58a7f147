// src/error.rs
//! Application error types.
//!
//! Compilers never fail; only the collaborators around them (Notion
//! fetches, Google Docs calls, ledger and output files) return these.

use std::fmt;
use thiserror::Error;

/// Error codes reported by the Notion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    RateLimited,
    ObjectNotFound,
    Unauthorized,
    RestrictedResource,
    InvalidJson,
    ValidationFailed,
    Conflict,
    InternalError,
    ServiceUnavailable,
    /// Only the HTTP status was usable.
    HttpStatus(u16),
    Unknown(String),
}

const NAMED_CODES: [(&str, NotionErrorCode); 9] = [
    ("rate_limited", NotionErrorCode::RateLimited),
    ("object_not_found", NotionErrorCode::ObjectNotFound),
    ("unauthorized", NotionErrorCode::Unauthorized),
    ("restricted_resource", NotionErrorCode::RestrictedResource),
    ("invalid_json", NotionErrorCode::InvalidJson),
    ("validation_error", NotionErrorCode::ValidationFailed),
    ("conflict_error", NotionErrorCode::Conflict),
    ("internal_server_error", NotionErrorCode::InternalError),
    ("service_unavailable", NotionErrorCode::ServiceUnavailable),
];

impl NotionErrorCode {
    pub fn from_api_response(code: &str) -> Self {
        NAMED_CODES
            .iter()
            .find(|(name, _)| *name == code)
            .map(|(_, parsed)| parsed.clone())
            .unwrap_or_else(|| Self::Unknown(code.to_string()))
    }

    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::RestrictedResource | Self::Unauthorized | Self::HttpStatus(401 | 403)
        )
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => f.write_str(code),
            named => {
                let name = NAMED_CODES
                    .iter()
                    .find(|(_, code)| code == named)
                    .map(|(name, _)| *name)
                    .unwrap_or("unknown");
                f.write_str(name)
            }
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Google Docs API returned {status}: {message}")]
    DocsService { status: u16, message: String },

    #[error("{operation} addresses index {index} outside a document of length {length}")]
    OperationOutOfBounds {
        operation: &'static str,
        index: usize,
        length: usize,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error(transparent)]
    NotionClient(#[from] NotionClientError),
}

impl AppError {
    /// Whether retrying the same request may succeed.
    ///
    /// Rate limits, 5xx responses and transport timeouts qualify; anything
    /// describing the request itself does not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkFailure(err) => err.is_timeout() || err.is_connect(),
            AppError::NotionService { code, .. } => code.is_retryable(),
            AppError::DocsService { status, .. } => *status == 429 || *status >= 500,
            AppError::NotionClient(NotionClientError::NotionApi { status, .. }) => {
                *status == 429 || *status >= 500
            }
            AppError::NotionClient(NotionClientError::Transport { .. }) => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Notion client error mapping
#[derive(Error, Debug)]
pub enum NotionClientError {
    #[error("Failed to serialize request: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize response: {source}\nBody: {body}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("HTTP transport error: {message}")]
    Transport { message: String },

    #[error("Invalid authentication header: {message}")]
    InvalidHeader { message: String },

    #[error("Notion API error ({status}): {code} - {message}")]
    NotionApi {
        status: u32,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("Type conversion error: {message}")]
    ConversionError { message: String },
}

// Convert notion_client errors to our error hierarchy
impl From<notion_client::NotionClientError> for NotionClientError {
    fn from(err: notion_client::NotionClientError) -> Self {
        use notion_client::NotionClientError as NcError;

        match err {
            NcError::FailedToSerialize { source } => Self::Serialization { source },
            NcError::FailedToDeserialize { source, body } => Self::Deserialization { source, body },
            NcError::FailedToRequest { source }
            | NcError::FailedToText { source }
            | NcError::FailedToBuildRequest { source } => Self::Transport {
                message: source.to_string(),
            },
            NcError::InvalidHeader { source } => Self::InvalidHeader {
                message: source.to_string(),
            },
            NcError::InvalidStatusCode { error } => Self::NotionApi {
                status: error.status,
                code: error.code,
                message: error.message,
                request_id: error.request_id,
            },
        }
    }
}

/// Why the rows of a linked database could not be queried.
///
/// A classification, not an error: row tables are optional decoration, so
/// each reason only changes the warning that is logged.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseFetchFailure {
    /// The database is a linked database (Notion API limitation).
    LinkedDatabase,
    /// The integration lacks permission to access this database.
    PermissionDenied { reason: String },
    /// The database was not found.
    NotFound,
    /// Some other failure occurred.
    Other { cause: String },
}

impl std::fmt::Display for DatabaseFetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LinkedDatabase => write!(
                f,
                "linked database (Notion API does not support retrieving linked databases)"
            ),
            Self::PermissionDenied { reason } => write!(f, "permission denied: {}", reason),
            Self::NotFound => write!(f, "database not found"),
            Self::Other { cause } => write!(f, "{}", cause),
        }
    }
}

/// Why a database query failed, for the warning logged in place of its rows.
pub fn classify_database_fetch_failure(error: &AppError) -> DatabaseFetchFailure {
    let (code, message) = match error {
        AppError::NotionClient(NotionClientError::NotionApi { code, message, .. }) => {
            (NotionErrorCode::from_api_response(code), message.as_str())
        }
        AppError::NotionService { code, message, .. } => (code.clone(), message.as_str()),
        other => {
            return DatabaseFetchFailure::Other {
                cause: other.to_string(),
            }
        }
    };

    if message.contains("linked database") {
        DatabaseFetchFailure::LinkedDatabase
    } else if code.is_not_found() {
        DatabaseFetchFailure::NotFound
    } else if code.is_access_denied() {
        DatabaseFetchFailure::PermissionDenied {
            reason: message.to_string(),
        }
    } else {
        DatabaseFetchFailure::Other {
            cause: format!("{}: {}", code, message),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
