//! Per-pair cost and return calculation.

use arbscan_core::ProductPair;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::estimator::MissingAttributeEstimator;
use crate::types::{AnalyzedProduct, CostModel, RoiData};

/// Rounds to cents, halves away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Nearest whole percent, halves rounded up. `None` when the figure does not
/// fit.
fn whole_percent(ratio: Decimal) -> Option<i64> {
    ratio
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_add(Decimal::new(5, 1))?
        .floor()
        .to_i64()
}

/// `None` when any step overflows.
fn roi(amazon_price: Decimal, paid: Decimal, fba_cost: Decimal) -> Option<RoiData> {
    let total_cost = paid.checked_add(fba_cost)?;
    let dollar_roi = round2(amazon_price.checked_sub(total_cost)?);
    let percent_roi = if total_cost.is_zero() {
        None
    } else {
        Some(whole_percent(dollar_roi.checked_div(total_cost)?)?)
    };
    Some(RoiData {
        total_cost,
        dollar_roi,
        percent_roi,
    })
}

struct Costs {
    fba_cost: Decimal,
    total_paid: Decimal,
    base: RoiData,
    gift_card: RoiData,
}

fn costs(pair: &ProductPair, amazon_price: Decimal, weight: Decimal, model: &CostModel) -> Option<Costs> {
    let fba_cost = round2(weight.ceil().checked_mul(model.fba_cost_per_pound)?);
    let price = pair.left.price;
    let tax = model.tax_rate.checked_mul(price)?;
    let total_paid = round2(
        price
            .checked_add(pair.left.shipping_cost())?
            .checked_add(tax)?,
    );
    let gift_card_paid = round2(model.gift_card_rate.checked_mul(total_paid)?);
    Some(Costs {
        fba_cost,
        total_paid,
        base: roi(amazon_price, total_paid, fba_cost)?,
        gift_card: roi(amazon_price, gift_card_paid, fba_cost)?,
    })
}

/// Costs every pair and attaches base and gift-card ROI.
///
/// Pairs with no Amazon price are dropped. A pair with no weight takes the
/// estimator's value for its sales-rank category and is flagged
/// `weight_estimated`; without an estimate it is dropped. Pairs whose figures
/// overflow are dropped with a warning.
pub fn analyze_costs(
    pairs: Vec<ProductPair>,
    model: &CostModel,
    estimator: &dyn MissingAttributeEstimator,
) -> Vec<AnalyzedProduct> {
    let total = pairs.len();
    let mut unpriced = 0usize;
    let mut unweighed = 0usize;
    let mut estimated = 0usize;
    let mut overflowed = 0usize;
    let mut analyzed = Vec::with_capacity(total);

    for mut pair in pairs {
        let Some(amazon_price) = pair.right.price() else {
            unpriced += 1;
            continue;
        };

        let weight = match pair.right.weight_pounds {
            Some(weight) => weight,
            None => {
                let estimate = pair
                    .right
                    .sales_rank_category()
                    .and_then(|c| estimator.estimate_missing_attribute(c));
                let Some(weight) = estimate else {
                    unweighed += 1;
                    continue;
                };
                pair.right.weight_pounds = Some(weight);
                pair.right.weight_estimated = true;
                estimated += 1;
                weight
            }
        };

        let Some(costs) = costs(&pair, amazon_price, weight, model) else {
            tracing::warn!(
                upc = %pair.left.upc,
                asin = %pair.right.asin,
                "cost figures overflow; pair dropped"
            );
            overflowed += 1;
            continue;
        };

        analyzed.push(AnalyzedProduct {
            base: costs.base,
            gift_card: costs.gift_card,
            fba_cost: costs.fba_cost,
            total_paid: costs.total_paid,
            pair,
        });
    }

    tracing::info!(
        pairs = total,
        analyzed = analyzed.len(),
        unpriced,
        unweighed,
        estimated,
        overflowed,
        "cost analysis complete"
    );
    analyzed
}

#[cfg(test)]
#[path = "cost_test.rs"]
mod tests;
