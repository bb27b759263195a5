//! Static request staggering.
//!
//! Batch `i` of a set starts no earlier than `i * interval` after the set is
//! issued, so concurrently launched requests reach the wire at roughly one
//! per interval. The schedule is fixed up-front and does not react to server
//! responses or 429s; wall time for a set grows linearly with its size.

use std::future::Future;
use std::time::Duration;

/// Start offset for the batch at `index`.
///
/// Saturates at `Duration::MAX` rather than overflowing.
#[must_use]
pub fn delay_for(index: usize, interval: Duration) -> Duration {
    let factor = u32::try_from(index).unwrap_or(u32::MAX);
    interval.saturating_mul(factor)
}

/// Waits out the start offset for `index`, then drives `fut` to completion.
pub async fn run_scheduled<F>(index: usize, interval: Duration, fut: F) -> F::Output
where
    F: Future,
{
    let delay = delay_for(index, interval);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    fut.await
}
