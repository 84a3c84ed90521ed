//! Storage layer for the Gateway
//!
//! This module provides persistence for completed sub-requests.

/// Database storage module
pub mod database;

pub use database::RequestLogStore;
