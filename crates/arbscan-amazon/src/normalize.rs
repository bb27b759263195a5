//! Conversion from raw product API results to domain types.

use arbscan_core::{AmazonProduct, SalesRank};
use rust_decimal::Decimal;

use crate::types::{
    IdMatch, LowestOffer, MatchResult, RawMatchResult, RawMeasure, RawOfferResult, RawProduct,
};

const SUCCESS: &str = "Success";

/// Pounds per unit for the weight units the catalog reports.
fn pounds_per_unit(units: &str) -> Option<Decimal> {
    match units.trim().to_ascii_lowercase().as_str() {
        "pounds" | "pound" | "lb" | "lbs" => Some(Decimal::ONE),
        "ounces" | "ounce" | "oz" => Some(Decimal::new(625, 4)),
        "kilograms" | "kilogram" | "kg" => Some(Decimal::new(220_462, 5)),
        "grams" | "gram" | "g" => Some(Decimal::new(220_462, 8)),
        _ => None,
    }
}

/// Package weight converted to pounds. Unknown units and values too large to
/// convert yield `None`.
#[must_use]
pub fn weight_in_pounds(measure: &RawMeasure) -> Option<Decimal> {
    let Some(factor) = pounds_per_unit(&measure.units) else {
        tracing::debug!(units = %measure.units, "unrecognised weight units");
        return None;
    };
    let pounds = measure.value.checked_mul(factor);
    if pounds.is_none() {
        tracing::warn!(value = %measure.value, units = %measure.units, "weight overflows; treated as missing");
    }
    pounds
}

/// Builds an [`AmazonProduct`] from a matched product. Returns `None` when the
/// product carries no attribute set.
#[must_use]
pub fn product_from_raw(raw: RawProduct, lookup_id: &str) -> Option<AmazonProduct> {
    let attributes = raw.attributes?;
    let best_sales_rank = raw
        .sales_rankings
        .into_iter()
        .min_by_key(|r| r.rank)
        .map(|r| SalesRank {
            category_id: r.product_category_id,
            rank: r.rank,
        });

    Some(AmazonProduct {
        asin: raw.asin,
        lookup_id: lookup_id.to_string(),
        brand: attributes.brand,
        title: attributes.title.unwrap_or_default(),
        product_group: attributes.product_group,
        list_price: attributes.list_price.map(|m| m.amount),
        landed_price: None,
        weight_pounds: attributes
            .package_dimensions
            .and_then(|d| d.weight)
            .as_ref()
            .and_then(weight_in_pounds),
        weight_estimated: false,
        best_sales_rank,
    })
}

/// Classifies one per-id matching result.
#[must_use]
pub fn match_from_raw(raw: RawMatchResult) -> IdMatch {
    let id = raw.id;
    if raw.status != SUCCESS {
        let message = raw
            .error
            .and_then(|e| e.message.or(e.code))
            .unwrap_or(raw.status);
        return IdMatch {
            id,
            result: MatchResult::Failed(message),
        };
    }

    let mut products = raw.products;
    let result = match products.len() {
        0 => MatchResult::NoMatch,
        1 => match products.pop().and_then(|p| product_from_raw(p, &id)) {
            Some(product) => MatchResult::Single(Box::new(product)),
            None => MatchResult::Failed("matched product has no attribute set".to_string()),
        },
        n => MatchResult::Multiple(n),
    };
    IdMatch { id, result }
}

/// Cheapest landed price among an ASIN's listings; `None` when the lookup
/// failed or there are no listings.
#[must_use]
pub fn lowest_offer_from_raw(raw: RawOfferResult) -> Option<LowestOffer> {
    if raw.status != SUCCESS {
        return None;
    }
    let landed_price = raw.listings.iter().map(|l| l.landed_price.amount).min()?;
    Some(LowestOffer {
        asin: raw.asin,
        landed_price,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    fn raw_match(value: serde_json::Value) -> RawMatchResult {
        serde_json::from_value(value).unwrap()
    }

    fn full_product(asin: &str) -> serde_json::Value {
        json!({
            "asin": asin,
            "attributes": {
                "brand": "Hasbro",
                "title": "Connect 4",
                "productGroup": "Toy",
                "listPrice": {"amount": "14.99", "currencyCode": "USD"},
                "packageDimensions": {"weight": {"value": "24", "units": "ounces"}}
            },
            "salesRankings": [
                {"productCategoryId": "toy_display_on_website", "rank": 1520},
                {"productCategoryId": "166359011", "rank": 12}
            ]
        })
    }

    #[test]
    fn single_product_match() {
        let matched = match_from_raw(raw_match(json!({
            "id": "630509278862",
            "status": "Success",
            "products": [full_product("B00000DMD2")]
        })));
        assert_eq!(matched.id, "630509278862");
        let MatchResult::Single(product) = matched.result else {
            panic!("expected single match");
        };
        assert_eq!(product.asin, "B00000DMD2");
        assert_eq!(product.lookup_id, "630509278862");
        assert_eq!(product.list_price, Some(Decimal::from_str("14.99").unwrap()));
        assert_eq!(product.weight_pounds, Some(Decimal::from_str("1.5").unwrap()));
        assert_eq!(product.product_group.as_deref(), Some("Toy"));
        let rank = product.best_sales_rank.as_ref().unwrap();
        assert_eq!(rank.rank, 12);
        assert_eq!(rank.category_id, "166359011");
    }

    #[test]
    fn several_products_is_multiple() {
        let matched = match_from_raw(raw_match(json!({
            "id": "1",
            "status": "Success",
            "products": [full_product("B1"), full_product("B2")]
        })));
        assert!(matches!(matched.result, MatchResult::Multiple(2)));
    }

    #[test]
    fn no_products_is_no_match() {
        let matched = match_from_raw(raw_match(json!({"id": "1", "status": "Success"})));
        assert!(matches!(matched.result, MatchResult::NoMatch));
    }

    #[test]
    fn error_status_carries_message() {
        let matched = match_from_raw(raw_match(json!({
            "id": "1",
            "status": "ClientError",
            "error": {"code": "InvalidParameterValue", "message": "Invalid UPC identifier"}
        })));
        let MatchResult::Failed(message) = matched.result else {
            panic!("expected failure");
        };
        assert_eq!(message, "Invalid UPC identifier");
    }

    #[test]
    fn attributeless_product_is_not_single() {
        let matched = match_from_raw(raw_match(json!({
            "id": "1",
            "status": "Success",
            "products": [{"asin": "B1"}]
        })));
        assert!(matches!(matched.result, MatchResult::Failed(_)));
    }

    #[test]
    fn weight_units_convert_to_pounds() {
        let measure = |value: &str, units: &str| RawMeasure {
            value: Decimal::from_str(value).unwrap(),
            units: units.to_string(),
        };
        assert_eq!(weight_in_pounds(&measure("2.5", "pounds")), Some(Decimal::from_str("2.5").unwrap()));
        assert_eq!(weight_in_pounds(&measure("8", "ounces")), Some(Decimal::from_str("0.5").unwrap()));
        assert_eq!(weight_in_pounds(&measure("1", "kilograms")), Some(Decimal::from_str("2.20462").unwrap()));
        assert_eq!(weight_in_pounds(&measure("1", "stone")), None);
    }

    #[test]
    fn weight_too_large_to_convert_is_missing() {
        let measure = RawMeasure {
            value: Decimal::MAX,
            units: "kilograms".to_string(),
        };
        assert_eq!(weight_in_pounds(&measure), None);

        let pounds = RawMeasure {
            value: Decimal::MAX,
            units: "pounds".to_string(),
        };
        assert_eq!(weight_in_pounds(&pounds), Some(Decimal::MAX));
    }

    #[test]
    fn lowest_offer_is_minimum_landed_price() {
        let raw: RawOfferResult = serde_json::from_value(json!({
            "asin": "B1",
            "status": "Success",
            "listings": [
                {"landedPrice": {"amount": "21.50"}},
                {"landedPrice": {"amount": "19.75"}},
                {"landedPrice": {"amount": "25.00"}}
            ]
        }))
        .unwrap();
        let offer = lowest_offer_from_raw(raw).unwrap();
        assert_eq!(offer.landed_price, Decimal::from_str("19.75").unwrap());
    }

    #[test]
    fn no_listings_means_no_offer() {
        let raw: RawOfferResult =
            serde_json::from_value(json!({"asin": "B1", "status": "Success", "listings": []}))
                .unwrap();
        assert!(lowest_offer_from_raw(raw).is_none());
    }
}
