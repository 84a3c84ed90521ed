//! Database storage implementation using SeaORM
//!
//! This module provides the request log entity, its migration and the store.

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// Request log store module
pub mod request_log;

pub use request_log::RequestLogStore;
