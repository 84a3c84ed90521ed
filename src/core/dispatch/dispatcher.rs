//! Concurrent batch dispatch
//!
//! One tokio task per descriptor, gated by an optional per-batch semaphore.
//! The dispatcher joins every task before returning; results go straight into
//! index-addressed slots as tasks finish.

use super::aggregator::{BatchOutcome, ResultAggregator, ResultSlots};
use super::error::ItemError;
use super::executor::SingleRequestExecutor;
use super::types::{ExecutionResult, SubRequestDescriptor};
use crate::config::DispatchConfig;
use crate::utils::error::Result;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Fans a batch out to concurrent executors and joins the results
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    executor: Arc<SingleRequestExecutor>,
    /// Simultaneous in-flight items per batch, `None` for unbounded
    max_concurrency: Option<usize>,
    batch_timeout: Option<Duration>,
    /// Runtime the units are spawned on, the caller's runtime when `None`
    runtime: Option<Handle>,
}

impl BatchDispatcher {
    /// Create a dispatcher with its own executor
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        let executor = SingleRequestExecutor::new(config)?;
        Ok(Self::with_executor(executor, config))
    }

    /// Create a dispatcher around an existing executor
    pub fn with_executor(executor: SingleRequestExecutor, config: &DispatchConfig) -> Self {
        Self {
            executor: Arc::new(executor),
            max_concurrency: config
                .concurrency_limit()
                .map(|n| n.min(Semaphore::MAX_PERMITS)),
            batch_timeout: config.batch_timeout(),
            runtime: None,
        }
    }

    /// Spawn dispatch units on `runtime` instead of the calling runtime
    ///
    /// Actix workers each drive a single-threaded runtime, so the server hands
    /// the dispatcher the multi-threaded runtime it was started from.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Execute every descriptor and return results in submission order
    pub async fn dispatch(&self, descriptors: Vec<SubRequestDescriptor>) -> BatchOutcome {
        let start = Instant::now();
        let total = descriptors.len();
        if total == 0 {
            debug!("Empty batch, nothing to dispatch");
            return BatchOutcome::default();
        }

        let targets: Vec<(String, String)> = descriptors
            .iter()
            .map(|d| (d.url.clone(), d.method.clone()))
            .collect();
        let limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));

        let mut units = JoinSet::new();
        for (index, descriptor) in descriptors.into_iter().enumerate() {
            let executor = Arc::clone(&self.executor);
            let limiter = limiter.clone();
            let unit = async move {
                let _permit = match limiter {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => {
                            return ExecutionResult::failed(
                                index,
                                ItemError::Internal("dispatch limiter closed".to_string()),
                            );
                        }
                    },
                    None => None,
                };
                run_isolated(index, executor.execute(index, descriptor)).await
            };
            match &self.runtime {
                Some(runtime) => units.spawn_on(unit, runtime),
                None => units.spawn(unit),
            };
        }

        let mut slots = ResultSlots::new(total);
        let deadline_hit = self.join_all(&mut units, &mut slots).await;

        let outcome = ResultAggregator::assemble(slots, targets, start.elapsed(), || {
            if deadline_hit {
                ItemError::BatchDeadline
            } else {
                ItemError::Internal("dispatch unit terminated before reporting".to_string())
            }
        });

        info!(
            batch_size = outcome.summary.total,
            succeeded = outcome.summary.succeeded,
            failed = outcome.summary.failed,
            elapsed_ms = outcome.summary.elapsed.as_millis() as u64,
            "Batch dispatched"
        );
        outcome
    }

    /// Wait for every unit, depositing results as they arrive
    ///
    /// Returns `true` if the batch deadline expired. Units still running at
    /// that point are aborted; ones that already finished are still collected.
    async fn join_all(
        &self,
        units: &mut JoinSet<ExecutionResult>,
        slots: &mut ResultSlots,
    ) -> bool {
        let deadline = self
            .batch_timeout
            .map(|limit| tokio::time::Instant::now() + limit);

        loop {
            let joined = match deadline {
                Some(at) => match tokio::time::timeout_at(at, units.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => break,
                },
                None => units.join_next().await,
            };

            match joined {
                Some(Ok(result)) => {
                    slots.deposit(result);
                }
                Some(Err(e)) => warn!(error = %e, "Dispatch unit terminated without reporting"),
                None => return false,
            }
        }

        warn!(
            reported = slots.reported(),
            total = slots.len(),
            "Batch deadline exceeded, aborting unfinished sub-requests"
        );
        units.abort_all();
        while let Some(joined) = units.join_next().await {
            if let Ok(result) = joined {
                slots.deposit(result);
            }
        }
        true
    }
}

/// Run one unit, converting a panic into an error result for its index
async fn run_isolated<F>(index: usize, unit: F) -> ExecutionResult
where
    F: Future<Output = ExecutionResult>,
{
    match AssertUnwindSafe(unit).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(index, panic = %message, "Sub-request panicked");
            ExecutionResult::failed(index, ItemError::Internal(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "sub-request panicked".to_string()
    }
}
