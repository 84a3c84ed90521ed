//! Types shared by the dispatch pipeline

use super::error::ItemError;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// One entry of an inbound batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRequestDescriptor {
    /// Target URL
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// HTTP method, passed through as given
    #[serde(default, deserialize_with = "null_as_empty")]
    pub method: String,
    /// Base64-encoded payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl SubRequestDescriptor {
    /// Create a descriptor without a body
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            body: None,
        }
    }

    /// Attach an already base64-encoded body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// JSON `null` reads as an empty string so it fails per-item validation
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Descriptor that passed validation and is ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub method: String,
    pub url: String,
    /// Decoded payload, empty when the descriptor had none
    pub body: Bytes,
}

/// Terminal outcome of one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Position in the original batch
    pub index: usize,
    pub status_code: Option<u16>,
    pub response_body: Option<Bytes>,
    pub error: Option<ItemError>,
}

impl ExecutionResult {
    /// Result of an outbound call that returned a response
    pub fn completed(index: usize, status_code: u16, response_body: Bytes) -> Self {
        Self {
            index,
            status_code: Some(status_code),
            response_body: Some(response_body),
            error: None,
        }
    }

    /// Result of an item that failed at any stage
    pub fn failed(index: usize, error: ItemError) -> Self {
        Self {
            index,
            status_code: None,
            response_body: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Response body as text, replacing invalid UTF-8 sequences
    pub fn body_text(&self) -> Option<String> {
        self.response_body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// `(url, method, status)` of an item that completed, for the request log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCall {
    pub url: String,
    pub method: String,
    pub status_code: u16,
}

/// Counters for one dispatched batch
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}
