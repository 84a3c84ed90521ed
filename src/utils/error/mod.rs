//! Error handling for the Gateway
//!
//! This module defines the service-level error type. Per-item dispatch
//! failures are not errors at this level; they live in
//! [`crate::core::dispatch::ItemError`] inside each result.

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
