//! Single outbound request execution
//!
//! [`SingleRequestExecutor::execute`] always produces a terminal
//! [`ExecutionResult`]; failures at any stage are recorded in the result and
//! never returned to the caller.

use super::error::ItemError;
use super::types::{ExecutionResult, SubRequestDescriptor, ValidatedRequest};
use super::validation::validate_descriptor;
use crate::config::DispatchConfig;
use crate::utils::error::Result;
use bytes::Bytes;
use reqwest::header::{CONNECTION, HeaderValue};
use reqwest::{Client, Method, Url};
use std::time::{Duration, Instant};
use tracing::debug;

/// Executes one descriptor against its remote endpoint
#[derive(Debug, Clone)]
pub struct SingleRequestExecutor {
    client: Client,
    item_timeout: Option<Duration>,
    keep_alive: bool,
}

impl SingleRequestExecutor {
    /// Build an executor with its own HTTP client
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone());

        if !config.keep_alive {
            builder = builder.pool_max_idle_per_host(0);
        }

        Ok(Self::with_client(builder.build()?, config))
    }

    /// Build an executor around an existing client
    pub fn with_client(client: Client, config: &DispatchConfig) -> Self {
        Self {
            client,
            item_timeout: config.item_timeout(),
            keep_alive: config.keep_alive,
        }
    }

    /// Run one descriptor to a terminal state
    pub async fn execute(&self, index: usize, desc: SubRequestDescriptor) -> ExecutionResult {
        let request = match validate_descriptor(&desc) {
            Ok(request) => request,
            Err(e) => {
                debug!(index, error = %e, "Sub-request rejected by validation");
                return ExecutionResult::failed(index, e);
            }
        };

        let start = Instant::now();
        let outcome = match self.item_timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(request))
                .await
                .unwrap_or(Err(ItemError::Timeout(limit))),
            None => self.send(request).await,
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok((status, body)) => {
                debug!(index, status, elapsed_ms, "Sub-request completed");
                ExecutionResult::completed(index, status, body)
            }
            Err(e) => {
                debug!(index, error = %e, kind = e.kind(), elapsed_ms, "Sub-request failed");
                ExecutionResult::failed(index, e)
            }
        }
    }

    /// Build, send and read one request
    ///
    /// The URL must parse as absolute before anything is sent, so a value with
    /// no scheme (`"not a url"`) fails as `RequestConstruction` rather than as a
    /// transport error.
    async fn send(&self, request: ValidatedRequest) -> std::result::Result<(u16, Bytes), ItemError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| ItemError::RequestConstruction(format!("{}: {}", request.method, e)))?;
        let url = Url::parse(&request.url)
            .map_err(|e| ItemError::RequestConstruction(format!("{}: {}", request.url, e)))?;

        let mut builder = self.client.request(method, url).body(request.body);
        if !self.keep_alive {
            builder = builder.header(CONNECTION, HeaderValue::from_static("close"));
        }
        let outbound = builder
            .build()
            .map_err(|e| ItemError::RequestConstruction(e.to_string()))?;

        let response = self.client.execute(outbound).await.map_err(|e| {
            if e.is_builder() {
                ItemError::RequestConstruction(e.to_string())
            } else {
                ItemError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ItemError::ResponseRead(e.to_string()))?;

        Ok((status, body))
    }
}
