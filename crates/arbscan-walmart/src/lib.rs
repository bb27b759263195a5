//! Walmart catalog API client.
//!
//! Fetches the category taxonomy, special-offer feeds, paginated item
//! listings, and item lookups, normalizing items into
//! [`arbscan_core::WalmartProduct`]. Multi-request walks are issued through
//! [`arbscan_batch::fetch_all_batches`] so one failed query never aborts a
//! run.

pub mod client;
pub mod error;
pub mod normalize;
pub mod query;
pub mod types;

pub use client::{WalmartClient, DEFAULT_BASE_URL, LOOKUP_BATCH_SIZE};
pub use error::WalmartError;
pub use normalize::{normalize_item, normalize_items};
pub use query::{ItemsQuery, SpecialFeed};
pub use types::{CategoryLeaf, ItemsPage, ItemsPayload, RawItem, Taxonomy};
