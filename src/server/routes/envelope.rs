//! Inbound and outbound JSON envelopes
//!
//! Batch request: `{"requests": [{"url", "method", "body"}]}`.
//! Response: `{"responses": [{"index", "responsecode", "response"} | {"index", "error"}]}`.

use crate::core::dispatch::{BatchOutcome, ExecutionResult, SubRequestDescriptor};
use crate::utils::error::{GatewayError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Inbound batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchEnvelope {
    /// Sub-requests in submission order; absent means an empty batch
    #[serde(default)]
    pub requests: Vec<SubRequestDescriptor>,
}

/// One entry of the outbound response list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub index: usize,
    #[serde(rename = "responsecode", default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ExecutionResult> for ItemResponse {
    fn from(result: &ExecutionResult) -> Self {
        match &result.error {
            Some(error) => Self {
                index: result.index,
                response_code: None,
                response: None,
                error: Some(error.to_string()),
            },
            None => Self {
                index: result.index,
                response_code: result.status_code,
                response: result.body_text(),
                error: None,
            },
        }
    }
}

/// Outbound aggregated response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub responses: Vec<ItemResponse>,
}

impl From<&BatchOutcome> for ResponseEnvelope {
    fn from(outcome: &BatchOutcome) -> Self {
        Self {
            responses: outcome.results.iter().map(ItemResponse::from).collect(),
        }
    }
}

/// Decode an inbound JSON object, rejecting empty and malformed input
///
/// The top level must be an object; derived serde impls would otherwise also
/// accept a struct written as a JSON array.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(GatewayError::bad_request("Empty request body"));
    }
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        GatewayError::bad_request(format!("Failed to parse request body: {}", e))
    })?;
    if !value.is_object() {
        return Err(GatewayError::bad_request("Request body must be a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| {
        GatewayError::bad_request(format!("Failed to parse request body: {}", e))
    })
}
