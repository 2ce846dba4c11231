use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Message returned to clients for every server-side failure.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("search index malformed: {0}")]
    IndexMalformed(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire shape of every error body. `results` is always present and empty so
/// clients can render an empty list without branching on the error.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub code: String,
    pub trace_id: String,
    pub results: Vec<serde_json::Value>,
}

impl SearchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::IndexUnavailable(_) => "INDEX_UNAVAILABLE",
            Self::IndexMalformed(_) => "INDEX_MALFORMED",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Build the client-facing payload. Client errors carry their own message
    /// as `error`; everything else collapses to the generic server error with
    /// the cause in `message`.
    pub fn to_payload(&self) -> ErrorPayload {
        let (error, message) = match self {
            Self::InvalidRequest(message) => (message.clone(), None),
            other => (INTERNAL_SERVER_ERROR.to_string(), Some(other.to_string())),
        };
        ErrorPayload {
            error,
            message,
            code: self.code().to_string(),
            trace_id: Uuid::new_v4().to_string(),
            results: Vec::new(),
        }
    }
}
