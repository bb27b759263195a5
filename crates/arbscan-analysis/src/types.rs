use arbscan_core::{AppConfig, ProductPair};
use rust_decimal::Decimal;
use serde::Serialize;

/// Rates applied when costing a purchase for resale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    /// Inbound fulfilment shipping per (rounded-up) pound.
    pub fba_cost_per_pound: Decimal,
    /// Sales tax charged on the retail price.
    pub tax_rate: Decimal,
    /// Effective cost of one retail dollar when paying with discounted gift
    /// cards, e.g. `0.98`.
    pub gift_card_rate: Decimal,
}

impl CostModel {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fba_cost_per_pound: config.fba_cost_per_pound,
            tax_rate: config.tax_rate,
            gift_card_rate: config.gift_card_rate,
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            fba_cost_per_pound: Decimal::new(50, 2),
            tax_rate: Decimal::new(6, 2),
            gift_card_rate: Decimal::new(98, 2),
        }
    }
}

/// Cost and return for one purchasing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoiData {
    pub total_cost: Decimal,
    pub dollar_roi: Decimal,
    /// Whole percent; `None` when the total cost is zero.
    pub percent_roi: Option<i64>,
}

/// A pair that survived cost analysis, with its figures attached.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedProduct {
    pub pair: ProductPair,
    pub fba_cost: Decimal,
    /// Retail price plus shipping and tax, before any gift-card discount.
    pub total_paid: Decimal,
    pub base: RoiData,
    pub gift_card: RoiData,
}

impl AnalyzedProduct {
    #[must_use]
    pub fn upc(&self) -> &str {
        &self.pair.left.upc
    }
}
