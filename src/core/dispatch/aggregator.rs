//! Result collection and ordering
//!
//! Dispatch units report in arbitrary order. Each result is written into the
//! pre-sized slot at its own index, so reading the slots front to back yields
//! submission order without sorting.

use super::error::ItemError;
use super::types::{BatchSummary, CompletedCall, ExecutionResult};
use std::time::Duration;
use tracing::warn;

/// Write-once, index-addressed result storage for one batch
#[derive(Debug)]
pub struct ResultSlots {
    slots: Vec<Option<ExecutionResult>>,
    reported: usize,
}

impl ResultSlots {
    /// Allocate `len` empty slots
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            reported: 0,
        }
    }

    /// Store a result at `result.index`
    ///
    /// Returns `false` and leaves the slots untouched if the index is out of
    /// range or the slot is already filled.
    pub fn deposit(&mut self, result: ExecutionResult) -> bool {
        let index = result.index;
        let len = self.slots.len();
        let Some(slot) = self.slots.get_mut(index) else {
            warn!(index, len, "Result index out of range");
            return false;
        };
        if slot.is_some() {
            warn!(index, "Duplicate result for slot ignored");
            return false;
        }

        *slot = Some(result);
        self.reported += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots filled so far
    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn is_complete(&self) -> bool {
        self.reported == self.slots.len()
    }
}

/// Aggregated outcome of one batch, ordered by index
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub results: Vec<ExecutionResult>,
    pub summary: BatchSummary,
    /// `(url, method)` per index, kept for the request log
    targets: Vec<(String, String)>,
}

impl BatchOutcome {
    /// `(url, method, status)` for every item that completed, in index order
    pub fn completed_calls(&self) -> Vec<CompletedCall> {
        self.results
            .iter()
            .filter_map(|result| {
                let status_code = result.status_code.filter(|_| result.is_success())?;
                let (url, method) = self.targets.get(result.index)?;
                Some(CompletedCall {
                    url: url.clone(),
                    method: method.clone(),
                    status_code,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Turns filled slots into the final ordered result sequence
pub struct ResultAggregator;

impl ResultAggregator {
    /// Assemble the ordered outcome
    ///
    /// A slot whose unit never reported is filled with `unreported()`, keeping
    /// `results.len() == slots.len()` and `results[i].index == i`.
    pub fn assemble<F>(
        slots: ResultSlots,
        targets: Vec<(String, String)>,
        elapsed: Duration,
        unreported: F,
    ) -> BatchOutcome
    where
        F: Fn() -> ItemError,
    {
        let results: Vec<ExecutionResult> = slots
            .slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.unwrap_or_else(|| ExecutionResult::failed(index, unreported())))
            .collect();

        let summary = Self::summarize(&results, elapsed);
        BatchOutcome {
            results,
            summary,
            targets,
        }
    }

    /// Success/failure counters for an ordered result set
    pub fn summarize(results: &[ExecutionResult], elapsed: Duration) -> BatchSummary {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        BatchSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            elapsed,
        }
    }
}
