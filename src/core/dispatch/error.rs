//! Per-item error taxonomy
//!
//! Every failure a single sub-request can hit is captured as an [`ItemError`] in
//! that item's result. These errors never escalate to the batch.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Required descriptor field that was missing or empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Url,
    Method,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Url => write!(f, "url"),
            MissingField::Method => write!(f, "method"),
        }
    }
}

/// Terminal failure of one sub-request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// Payload is not valid base64
    #[error("invalid request body: {0}")]
    Decode(String),

    /// `url` or `method` was empty
    #[error("missing {0}")]
    MissingField(MissingField),

    /// Method token or URL rejected while building the outbound request
    #[error("failed to build request: {0}")]
    RequestConstruction(String),

    /// Transport failure: DNS, refused connection, TLS, connect timeout
    #[error("request failed: {0}")]
    Network(String),

    /// Response headers arrived but the body could not be read
    #[error("failed to read response body: {0}")]
    ResponseRead(String),

    /// Per-item deadline expired
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Batch deadline expired before this item reported
    #[error("batch deadline exceeded")]
    BatchDeadline,

    /// The dispatch unit panicked or terminated without reporting
    #[error("internal error: {0}")]
    Internal(String),
}

impl ItemError {
    /// Whether the error was raised before any network activity
    pub fn is_validation(&self) -> bool {
        matches!(self, ItemError::Decode(_) | ItemError::MissingField(_))
    }

    /// Short machine-readable kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            ItemError::Decode(_) => "decode",
            ItemError::MissingField(_) => "missing_field",
            ItemError::RequestConstruction(_) => "request_construction",
            ItemError::Network(_) => "network",
            ItemError::ResponseRead(_) => "response_read",
            ItemError::Timeout(_) => "timeout",
            ItemError::BatchDeadline => "batch_deadline",
            ItemError::Internal(_) => "internal",
        }
    }
}
