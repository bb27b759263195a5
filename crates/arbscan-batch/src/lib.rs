//! Rate-limited batch fetching.
//!
//! Identifier lists are split into endpoint-sized batches, each batch is
//! started `index * interval` after the set is issued, every batch is awaited
//! to a terminal state, and the fulfilled payloads are concatenated in batch
//! order. A failing batch is logged and contributes nothing; it never aborts
//! its siblings.

pub mod aggregate;
pub mod batcher;
pub mod error;
pub mod schedule;

pub use aggregate::{fetch_all_batches, settle_all, BatchOutcome, Settled};
pub use batcher::batches;
pub use error::BatchError;
pub use schedule::{delay_for, run_scheduled};
