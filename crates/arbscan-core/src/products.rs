use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pairing::Paired;

/// Walmart top-level category ids. These rarely change, so they are kept
/// here to avoid a taxonomy request on every run; `arbscan categories`
/// refreshes them from the live taxonomy.
pub const DEFAULT_CATEGORY_IDS: &[&str] = &[
    "1334134", "91083", "5427", "1085666", "3920", "1105910", "5438", "3944", "976759",
    "1094765", "976760", "4044", "1072864", "1115193", "6197502", "3891", "4096", "4104",
    "7796869", "1229749", "2637", "5428", "1005862", "5440", "5426", "1085632", "4125",
    "4171", "2636", "6735581",
];

/// Special-offer feeds walked per category by default.
pub const DEFAULT_SPECIAL_FEEDS: &[&str] = &["clearance", "specialbuy", "bestsellers"];

/// A retailer-side item, normalized from the Walmart catalog API.
///
/// Only items that carry a UPC and are available online are ever built;
/// normalization drops everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalmartProduct {
    pub item_id: String,
    pub upc: String,
    pub name: String,
    pub brand_name: Option<String>,
    /// Effective purchase price: sale price when present, MSRP otherwise.
    pub price: Decimal,
    pub msrp: Option<Decimal>,
    pub standard_ship_rate: Option<Decimal>,
    /// Orders at or above this subtotal ship free.
    pub free_shipping_threshold: Option<Decimal>,
    pub stock: Option<String>,
    pub product_url: Option<String>,
}

impl WalmartProduct {
    /// Shipping charged for a single unit of this item.
    ///
    /// Free when the item qualifies for a free-shipping threshold on its own;
    /// otherwise the standard ship rate, or zero when Walmart reports none.
    #[must_use]
    pub fn shipping_cost(&self) -> Decimal {
        match self.free_shipping_threshold {
            Some(threshold) if self.price >= threshold => Decimal::ZERO,
            _ => self.standard_ship_rate.unwrap_or(Decimal::ZERO),
        }
    }
}

/// A sales-rank entry attached to an Amazon product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRank {
    pub category_id: String,
    pub rank: u64,
}

/// A marketplace-side product matched by a natural-key lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmazonProduct {
    pub asin: String,
    /// The identifier the product was matched by (a UPC in the standard flow).
    pub lookup_id: String,
    pub brand: Option<String>,
    pub title: String,
    /// Amazon product group, e.g. `"Toy"` or `"Kitchen"`.
    pub product_group: Option<String>,
    pub list_price: Option<Decimal>,
    /// Lowest landed price among current offers, when fetched.
    pub landed_price: Option<Decimal>,
    /// Package weight in pounds.
    pub weight_pounds: Option<Decimal>,
    /// `true` when `weight_pounds` was substituted from a category estimate.
    pub weight_estimated: bool,
    /// Lowest-numbered (best) sales rank across the product's categories.
    pub best_sales_rank: Option<SalesRank>,
}

impl AmazonProduct {
    /// Price used for profitability: landed offer price, falling back to list price.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.landed_price.or(self.list_price)
    }

    /// Category the product's best sales rank belongs to, if any.
    #[must_use]
    pub fn sales_rank_category(&self) -> Option<&str> {
        self.best_sales_rank
            .as_ref()
            .map(|r| r.category_id.as_str())
    }
}

/// A Walmart item and the single Amazon product sharing its UPC.
pub type ProductPair = Paired<WalmartProduct, AmazonProduct>;
