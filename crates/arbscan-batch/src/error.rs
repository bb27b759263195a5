use thiserror::Error;

/// Orchestration failures. Per-batch fetch failures are never reported
/// through this type; they are absorbed by the aggregator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("batch size must be greater than zero")]
    InvalidBatchSize,
}
