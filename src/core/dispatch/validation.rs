//! Descriptor validation
//!
//! Runs before any network activity. Checks are ordered and short-circuit:
//! payload decoding first, then `url`, then `method`.

use super::error::{ItemError, MissingField};
use super::types::{SubRequestDescriptor, ValidatedRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

/// Validate a descriptor and decode its payload
pub fn validate_descriptor(desc: &SubRequestDescriptor) -> Result<ValidatedRequest, ItemError> {
    let body = decode_body(desc.body.as_deref())?;

    if desc.url.is_empty() {
        return Err(ItemError::MissingField(MissingField::Url));
    }
    if desc.method.is_empty() {
        return Err(ItemError::MissingField(MissingField::Method));
    }

    Ok(ValidatedRequest {
        method: desc.method.clone(),
        url: desc.url.clone(),
        body,
    })
}

/// Decode a base64 payload; absent and empty both mean no body
fn decode_body(encoded: Option<&str>) -> Result<Bytes, ItemError> {
    match encoded {
        None | Some("") => Ok(Bytes::new()),
        Some(text) => STANDARD
            .decode(text)
            .map(Bytes::from)
            .map_err(|e| ItemError::Decode(e.to_string())),
    }
}
