//! Settle-all aggregation over scheduled batch fetches.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::future::join_all;

use crate::batcher::batches;
use crate::error::BatchError;
use crate::schedule::run_scheduled;

/// Terminal state of one asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T, E> {
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Settled::Fulfilled(value),
            Err(err) => Settled::Rejected(err),
        }
    }
}

/// Merged result of a batch set plus request/fulfilment counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome<R> {
    /// Fulfilled payloads concatenated in batch order.
    pub records: Vec<R>,
    /// Number of batches issued.
    pub requested: usize,
    /// Number of batches that fulfilled.
    pub fulfilled: usize,
}

impl<R> BatchOutcome<R> {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            requested: 0,
            fulfilled: 0,
        }
    }

    #[must_use]
    pub fn rejected(&self) -> usize {
        self.requested - self.fulfilled
    }
}

impl<R> fmt::Display for BatchOutcome<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} batches fulfilled, {} records",
            self.fulfilled,
            self.requested,
            self.records.len()
        )
    }
}

/// Drives every future to a terminal state and returns the outcomes in input
/// order. Never short-circuits on a failure.
pub async fn settle_all<I, Fut, T, E>(futures: I) -> Vec<Settled<T, E>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T, E>>,
{
    join_all(futures)
        .await
        .into_iter()
        .map(Settled::from)
        .collect()
}

/// Fetches `ids` in batches of `batch_size`, staggering batch `i` by
/// `i * interval`, and merges every fulfilled batch in batch order.
///
/// `fetch_one` receives the zero-based batch index and the batch slice.
/// Rejected batches are logged at `warn` and contribute no records; when
/// every batch rejects the result is an empty, successful outcome.
///
/// # Errors
///
/// Returns [`BatchError::InvalidBatchSize`] if `batch_size` is zero. No
/// per-batch failure is ever returned.
pub async fn fetch_all_batches<'a, T, R, E, F, Fut>(
    ids: &'a [T],
    batch_size: usize,
    interval: Duration,
    fetch_one: F,
) -> Result<BatchOutcome<R>, BatchError>
where
    F: Fn(usize, &'a [T]) -> Fut,
    Fut: Future<Output = Result<Vec<R>, E>>,
    E: fmt::Display,
{
    let chunks = batches(ids, batch_size)?;
    if chunks.is_empty() {
        return Ok(BatchOutcome::empty());
    }

    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    let requested = chunks.len();

    tracing::debug!(
        ids = ids.len(),
        batch_size,
        batches = requested,
        interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        "issuing batch set"
    );

    let pending = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| run_scheduled(index, interval, fetch_one(index, chunk)));
    let settled = settle_all(pending).await;

    let mut records = Vec::new();
    let mut fulfilled = 0usize;
    for (index, outcome) in settled.into_iter().enumerate() {
        match outcome {
            Settled::Fulfilled(items) => {
                fulfilled += 1;
                records.extend(items);
            }
            Settled::Rejected(err) => {
                tracing::warn!(
                    batch = index,
                    size = sizes[index],
                    error = %err,
                    "batch rejected; dropping its records"
                );
            }
        }
    }

    let outcome = BatchOutcome {
        records,
        requested,
        fulfilled,
    };
    tracing::info!(
        requested,
        fulfilled,
        rejected = outcome.rejected(),
        records = outcome.records.len(),
        "batch set settled"
    );
    Ok(outcome)
}
