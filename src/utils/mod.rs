//! Utility modules for the Gateway
//!
//! - **error**: service-level error type and its HTTP mapping

pub mod error;
