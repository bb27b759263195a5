//! Conversion from raw catalog items to [`WalmartProduct`].

use std::str::FromStr;

use arbscan_core::WalmartProduct;
use rust_decimal::Decimal;

use crate::types::RawItem;

/// Converts a JSON number price into a `Decimal` via its shortest decimal
/// representation, so `12.99` stays `12.99` rather than picking up binary
/// float noise.
fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

/// Normalizes a single catalog item.
///
/// Returns `None` for items that cannot be paired or priced: no UPC, not
/// available online, or neither a sale price nor an MSRP.
#[must_use]
pub fn normalize_item(raw: RawItem) -> Option<WalmartProduct> {
    if !raw.available_online {
        return None;
    }
    let upc = raw.upc.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;

    let msrp = raw.msrp.and_then(to_decimal);
    let price = raw.sale_price.and_then(to_decimal).or(msrp)?;

    let free_shipping_threshold = if raw.free_shipping_over_35 == Some(true) {
        Some(Decimal::from(35))
    } else if raw.free_shipping_over_50 == Some(true) {
        Some(Decimal::from(50))
    } else {
        None
    };

    Some(WalmartProduct {
        item_id: raw.item_id.to_string(),
        upc,
        name: raw.name.unwrap_or_default(),
        brand_name: raw.brand_name.filter(|b| !b.trim().is_empty()),
        price,
        msrp,
        standard_ship_rate: raw.standard_ship_rate.and_then(to_decimal),
        free_shipping_threshold,
        stock: raw.stock,
        product_url: raw.product_url,
    })
}

/// Normalizes a page's worth of items, dropping ineligible ones.
#[must_use]
pub fn normalize_items(raw: Vec<RawItem>) -> Vec<WalmartProduct> {
    let total = raw.len();
    let products: Vec<WalmartProduct> = raw.into_iter().filter_map(normalize_item).collect();
    if products.len() < total {
        tracing::debug!(
            total,
            kept = products.len(),
            "dropped items without UPC, price, or online availability"
        );
    }
    products
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
