//! Sequential filter stages over analyzed products.

use arbscan_core::{ProductPair, SalesRankThresholds};
use rust_decimal::Decimal;

use crate::cost::analyze_costs;
use crate::estimator::MissingAttributeEstimator;
use crate::types::{AnalyzedProduct, CostModel};

const COST_STAGE: &str = "cost";

fn log_stage(stage: &str, input: usize, kept: usize) {
    tracing::info!(stage, input, kept, "filter stage applied");
}

/// One step of the filter chain. Stages receive the whole list and return
/// the records they keep, in order.
pub trait FilterStage {
    fn name(&self) -> &'static str;
    fn apply(&self, products: Vec<AnalyzedProduct>) -> Vec<AnalyzedProduct>;
}

/// Runs stages strictly one after another.
#[derive(Default)]
pub struct FilterChain {
    stages: Vec<Box<dyn FilterStage>>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl FilterStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, mut products: Vec<AnalyzedProduct>) -> Vec<AnalyzedProduct> {
        for stage in &self.stages {
            let before = products.len();
            products = stage.apply(products);
            log_stage(stage.name(), before, products.len());
        }
        products
    }

    /// Costs `pairs` as the first stage, then runs the configured stages.
    pub fn run_pairs(
        &self,
        pairs: Vec<ProductPair>,
        model: &CostModel,
        estimator: &dyn MissingAttributeEstimator,
    ) -> Vec<AnalyzedProduct> {
        let before = pairs.len();
        let analyzed = analyze_costs(pairs, model, estimator);
        log_stage(COST_STAGE, before, analyzed.len());
        self.run(analyzed)
    }
}

/// Keeps products whose gift-card return clears both minimums.
///
/// The dollar minimum is exclusive, the percent minimum inclusive. Products
/// with no percent figure (zero cost) pass on the dollar test alone.
#[derive(Debug, Clone, Copy)]
pub struct RoiFilter {
    pub min_dollar_roi: Decimal,
    pub min_percent_roi: i64,
}

impl FilterStage for RoiFilter {
    fn name(&self) -> &'static str {
        "roi"
    }

    fn apply(&self, products: Vec<AnalyzedProduct>) -> Vec<AnalyzedProduct> {
        products
            .into_iter()
            .filter(|p| {
                p.gift_card.dollar_roi > self.min_dollar_roi
                    && p
                        .gift_card
                        .percent_roi
                        .is_none_or(|pct| pct >= self.min_percent_roi)
            })
            .collect()
    }
}

/// Keeps products ranked within the configured threshold for their product
/// group. Products with no group, no threshold for their group, or no sales
/// rank are kept for manual review.
#[derive(Debug, Clone)]
pub struct SalesRankFilter {
    thresholds: SalesRankThresholds,
}

impl SalesRankFilter {
    #[must_use]
    pub fn new(thresholds: SalesRankThresholds) -> Self {
        Self { thresholds }
    }

    fn keeps(&self, product: &AnalyzedProduct) -> bool {
        let amazon = &product.pair.right;
        let Some(group) = amazon.product_group.as_deref() else {
            return true;
        };
        let Some(max_rank) = self.thresholds.max_rank(group) else {
            return true;
        };
        amazon
            .best_sales_rank
            .as_ref()
            .is_none_or(|rank| rank.rank <= max_rank)
    }
}

impl FilterStage for SalesRankFilter {
    fn name(&self) -> &'static str {
        "sales_rank"
    }

    fn apply(&self, products: Vec<AnalyzedProduct>) -> Vec<AnalyzedProduct> {
        products.into_iter().filter(|p| self.keeps(p)).collect()
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
