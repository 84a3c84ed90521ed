//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::dispatch::{BatchDispatcher, BatchOutcome};
use crate::storage::RequestLogStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc so each actix worker clones cheaply.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Batch dispatcher, one outbound client for the whole process
    pub dispatcher: Arc<BatchDispatcher>,
    /// Request log, present only when persistence is enabled
    pub request_log: Option<Arc<RequestLogStore>>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(
        config: Config,
        dispatcher: BatchDispatcher,
        request_log: Option<RequestLogStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            request_log: request_log.map(Arc::new),
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Persist the completed calls of a batch in the background
    ///
    /// Never delays or alters the HTTP response; failures are only logged.
    pub fn record_completed(&self, outcome: &BatchOutcome) {
        let Some(store) = self.request_log.clone() else {
            return;
        };
        let calls = outcome.completed_calls();
        if calls.is_empty() {
            return;
        }

        tokio::spawn(async move {
            match store.record(&calls).await {
                Ok(rows) => debug!(rows, "Recorded completed sub-requests"),
                Err(e) => warn!(error = %e, "Failed to record completed sub-requests"),
            }
        });
    }
}
