//! Multi-request fetch loops for `WalmartClient`.

use std::time::Duration;

use arbscan_batch::{fetch_all_batches, BatchOutcome};
use arbscan_core::WalmartProduct;

use crate::error::WalmartError;
use crate::normalize::normalize_items;
use crate::query::{ItemsQuery, SpecialFeed};

use super::{WalmartClient, LOOKUP_BATCH_SIZE};

impl WalmartClient {
    /// Fetches every page of `query`, following `nextPage` cursors for at most
    /// `max_pages` pages in total.
    ///
    /// Pages after the first wait `interval` before being requested. A failed
    /// later page ends the walk and keeps what was already collected; the
    /// cursor cannot be resumed anyway.
    ///
    /// # Errors
    ///
    /// Returns the first page's error. Later page failures are logged, not
    /// returned.
    pub async fn fetch_query_pages(
        &self,
        query: &ItemsQuery,
        max_pages: usize,
        interval: Duration,
    ) -> Result<Vec<WalmartProduct>, WalmartError> {
        if max_pages == 0 {
            return Ok(Vec::new());
        }

        let first = self.paginated_items(query).await?;
        let mut products = normalize_items(first.items);
        let mut cursor = first.next_page;
        let mut pages = 1usize;

        while let Some(next) = cursor.take() {
            if pages >= max_pages {
                tracing::debug!(%query, max_pages, "page limit reached; stopping walk");
                break;
            }
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
            match self.next_page(&next).await {
                Ok(page) => {
                    pages += 1;
                    products.extend(normalize_items(page.items));
                    cursor = page.next_page;
                }
                Err(e) => {
                    tracing::warn!(
                        %query,
                        page = pages + 1,
                        error = %e,
                        "next page failed; keeping earlier pages"
                    );
                    break;
                }
            }
        }

        tracing::debug!(%query, pages, items = products.len(), "query walk complete");
        Ok(products)
    }

    /// Walks every `(feed, category)` combination, one batch per query, each
    /// staggered by `interval` and followed through its page cursor. A
    /// `brand` narrows every query to that brand.
    ///
    /// Queries are ordered feed-major: all categories for the first feed,
    /// then all categories for the next.
    ///
    /// Only batch starts are staggered. Batch `i` requests its page `p` at
    /// roughly `(i + p) * interval`, so up to `min(max_pages, queries)`
    /// requests can share one interval while several walks overlap.
    ///
    /// # Errors
    ///
    /// Only orchestration errors propagate; failed queries are dropped and
    /// counted in the outcome.
    pub async fn fetch_special_feeds(
        &self,
        category_ids: &[String],
        feeds: &[SpecialFeed],
        brand: Option<&str>,
        max_pages: usize,
        interval: Duration,
    ) -> Result<BatchOutcome<WalmartProduct>, WalmartError> {
        let queries: Vec<ItemsQuery> = feeds
            .iter()
            .flat_map(|feed| {
                category_ids
                    .iter()
                    .map(move |category| ItemsQuery::category_feed(category, *feed).with_brand(brand))
            })
            .collect();

        let outcome = fetch_all_batches(&queries, 1, interval, |_, batch| async move {
            let mut products = Vec::new();
            for query in batch {
                products.extend(self.fetch_query_pages(query, max_pages, interval).await?);
            }
            Ok::<_, WalmartError>(products)
        })
        .await?;

        tracing::info!(
            queries = queries.len(),
            %outcome,
            "special feeds fetched"
        );
        Ok(outcome)
    }

    /// Looks up items by Walmart item id, [`LOOKUP_BATCH_SIZE`] ids per call.
    ///
    /// # Errors
    ///
    /// Only orchestration errors propagate; failed batches are dropped and
    /// counted in the outcome.
    pub async fn lookup_items(
        &self,
        item_ids: &[String],
        interval: Duration,
    ) -> Result<BatchOutcome<WalmartProduct>, WalmartError> {
        let outcome = fetch_all_batches(item_ids, LOOKUP_BATCH_SIZE, interval, |_, batch| async move {
            let raw = self.lookup_items_page(batch).await?;
            Ok::<_, WalmartError>(normalize_items(raw))
        })
        .await?;

        tracing::info!(ids = item_ids.len(), %outcome, "item lookup complete");
        Ok(outcome)
    }
}
