//! Batched lookups for `AmazonClient`.

use std::time::Duration;

use arbscan_batch::{fetch_all_batches, BatchOutcome};
use arbscan_core::{pair_by_key_with_stats, AmazonProduct};

use crate::error::AmazonError;
use crate::types::{IdType, LowestOffer, MatchResult};

use super::{AmazonClient, LOWEST_OFFER_BATCH_SIZE, MATCHING_BATCH_SIZE};

impl AmazonClient {
    /// Matches every id, [`MATCHING_BATCH_SIZE`] per call, staggered by
    /// `interval`. Only ids with exactly one attributed product contribute a
    /// record; the rest are logged at `debug`.
    ///
    /// # Errors
    ///
    /// Only orchestration errors propagate; failed batches are dropped and
    /// counted in the outcome.
    pub async fn matching_products(
        &self,
        ids: &[String],
        id_type: IdType,
        interval: Duration,
    ) -> Result<BatchOutcome<AmazonProduct>, AmazonError> {
        let outcome = fetch_all_batches(ids, MATCHING_BATCH_SIZE, interval, |index, batch| async move {
            let matches = self.matching_page(batch, id_type).await?;
            let mut products = Vec::with_capacity(matches.len());
            for matched in matches {
                match matched.result {
                    MatchResult::Single(product) => products.push(*product),
                    MatchResult::Multiple(count) => {
                        tracing::debug!(batch = index, id = %matched.id, count, "ambiguous match skipped");
                    }
                    MatchResult::NoMatch => {
                        tracing::debug!(batch = index, id = %matched.id, "no match");
                    }
                    MatchResult::Failed(message) => {
                        tracing::debug!(batch = index, id = %matched.id, %message, "id lookup failed");
                    }
                }
            }
            Ok::<_, AmazonError>(products)
        })
        .await?;

        tracing::info!(ids = ids.len(), %id_type, %outcome, "matching complete");
        Ok(outcome)
    }

    /// Fetches lowest offers for every ASIN, [`LOWEST_OFFER_BATCH_SIZE`] per
    /// call, staggered by `interval`.
    ///
    /// # Errors
    ///
    /// Only orchestration errors propagate; failed batches are dropped and
    /// counted in the outcome.
    pub async fn lowest_offers(
        &self,
        asins: &[String],
        interval: Duration,
    ) -> Result<BatchOutcome<LowestOffer>, AmazonError> {
        let outcome = fetch_all_batches(asins, LOWEST_OFFER_BATCH_SIZE, interval, |_, batch| {
            self.lowest_offers_page(batch)
        })
        .await?;

        tracing::info!(asins = asins.len(), %outcome, "lowest offers fetched");
        Ok(outcome)
    }
}

/// Sets `landed_price` on each product from the offer with the same ASIN.
///
/// Uses the one-to-one pairing rule: a product whose ASIN appears on more
/// than one product, or that has no offer, keeps its list price.
#[must_use]
pub fn apply_lowest_offers(
    mut products: Vec<AmazonProduct>,
    offers: Vec<LowestOffer>,
) -> Vec<AmazonProduct> {
    let keyed: Vec<(usize, String)> = products
        .iter()
        .enumerate()
        .map(|(idx, p)| (idx, p.asin.clone()))
        .collect();

    let (pairs, stats) = pair_by_key_with_stats(
        keyed,
        offers,
        |(_, asin)| asin.clone(),
        |offer| offer.asin.clone(),
    );
    for pair in pairs {
        products[pair.left.0].landed_price = Some(pair.right.landed_price);
    }

    tracing::debug!(
        products = stats.left,
        offers = stats.right,
        applied = stats.paired,
        ambiguous = stats.ambiguous,
        "applied lowest offers"
    );
    products
}
