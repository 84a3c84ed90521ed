//! Common test utilities for fanout-gateway

pub mod database;
pub mod fixtures;

pub use database::{TestDatabase, test_db_config};
pub use fixtures::{mount_get, post_json, test_state};
