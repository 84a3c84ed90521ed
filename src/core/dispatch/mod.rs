//! Batch request dispatch
//!
//! Turns an ordered list of sub-request descriptors into concurrent outbound
//! HTTP calls and returns one result per descriptor, in submission order.
//!
//! Pipeline, leaf first:
//! - [`validation`]: per-item checks before any network activity
//! - [`executor`]: one outbound call to a terminal result
//! - [`dispatcher`]: concurrent fan-out and join
//! - [`aggregator`]: index-addressed collection and ordering

pub mod aggregator;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod types;
pub mod validation;

pub use aggregator::{BatchOutcome, ResultAggregator, ResultSlots};
pub use dispatcher::BatchDispatcher;
pub use error::{ItemError, MissingField};
pub use executor::SingleRequestExecutor;
pub use types::{
    BatchSummary, CompletedCall, ExecutionResult, SubRequestDescriptor, ValidatedRequest,
};
pub use validation::validate_descriptor;
