//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite request log.

use fanout_gateway::config::DatabaseConfig;
use fanout_gateway::storage::RequestLogStore;
use fanout_gateway::storage::database::entities::request_log;
use std::sync::Arc;
use std::time::Duration;

/// In-memory request log with migrations applied
#[derive(Clone)]
pub struct TestDatabase {
    inner: Arc<RequestLogStore>,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let store = RequestLogStore::connect(&test_db_config())
            .await
            .expect("Failed to create in-memory test database");
        store
            .migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            inner: Arc::new(store),
        }
    }

    pub fn store(&self) -> &RequestLogStore {
        &self.inner
    }

    pub fn store_arc(&self) -> Arc<RequestLogStore> {
        Arc::clone(&self.inner)
    }

    /// Poll until at least `count` rows exist, since recording happens off the response path
    pub async fn wait_for_rows(&self, count: usize) -> Vec<request_log::Model> {
        for _ in 0..50 {
            let rows = self.inner.recent(100).await.expect("query request log");
            if rows.len() >= count {
                return rows;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.inner.recent(100).await.expect("query request log")
    }
}

/// In-memory SQLite only supports a single shared connection
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
        enabled: true,
    }
}
