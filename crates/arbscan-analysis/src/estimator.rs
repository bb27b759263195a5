//! Stand-in values for attributes the marketplace did not report.

use std::collections::HashMap;

use arbscan_core::AmazonProduct;
use rust_decimal::Decimal;

/// Supplies a substitute for a missing product attribute, keyed by the
/// product's sales-rank category.
pub trait MissingAttributeEstimator {
    fn estimate_missing_attribute(&self, category_id: &str) -> Option<Decimal>;
}

/// Samples at or above which a category's estimate is scaled down.
const REPRESENTATIVE_SAMPLES: usize = 5;

/// Weight estimator built from the products whose weight is known.
///
/// For each sales-rank category it records the largest rounded-up weight.
/// Categories with at least five samples report `ceil(max * 0.75)`; smaller
/// samples report the max itself.
#[derive(Debug, Clone, Default)]
pub struct CategoryMaxWeightEstimator {
    by_category: HashMap<String, Decimal>,
}

impl CategoryMaxWeightEstimator {
    pub fn from_products<'a, I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a AmazonProduct>,
    {
        let mut stats: HashMap<String, (Decimal, usize)> = HashMap::new();
        for product in products {
            let (Some(weight), Some(category)) =
                (product.weight_pounds, product.sales_rank_category())
            else {
                continue;
            };
            let weight = weight.ceil();
            let entry = stats
                .entry(category.to_string())
                .or_insert((weight, 0));
            if weight > entry.0 {
                entry.0 = weight;
            }
            entry.1 += 1;
        }

        let scale = Decimal::new(75, 2);
        let by_category = stats
            .into_iter()
            .map(|(category, (max, samples))| {
                let estimate = if samples >= REPRESENTATIVE_SAMPLES {
                    max.checked_mul(scale).map_or(max, |scaled| scaled.ceil())
                } else {
                    max
                };
                (category, estimate)
            })
            .collect();

        Self { by_category }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

impl MissingAttributeEstimator for CategoryMaxWeightEstimator {
    fn estimate_missing_attribute(&self, category_id: &str) -> Option<Decimal> {
        self.by_category.get(category_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use arbscan_core::SalesRank;

    use super::*;

    fn product(weight: Option<&str>, category: Option<&str>) -> AmazonProduct {
        AmazonProduct {
            asin: "B1".to_string(),
            lookup_id: "1".to_string(),
            brand: None,
            title: String::new(),
            product_group: None,
            list_price: None,
            landed_price: None,
            weight_pounds: weight.map(|w| Decimal::from_str(w).unwrap()),
            weight_estimated: false,
            best_sales_rank: category.map(|c| SalesRank {
                category_id: c.to_string(),
                rank: 1,
            }),
        }
    }

    #[test]
    fn few_samples_use_rounded_max() {
        let products = vec![
            product(Some("1.2"), Some("toy")),
            product(Some("3.1"), Some("toy")),
            product(Some("0.4"), Some("toy")),
        ];
        let estimator = CategoryMaxWeightEstimator::from_products(&products);
        assert_eq!(estimator.estimate_missing_attribute("toy"), Some(Decimal::from(4)));
    }

    #[test]
    fn five_samples_scale_to_three_quarters() {
        let products: Vec<AmazonProduct> = ["1", "2", "9.5", "3", "4"]
            .iter()
            .map(|w| product(Some(w), Some("kitchen")))
            .collect();
        let estimator = CategoryMaxWeightEstimator::from_products(&products);
        // max ceil = 10, 10 * 0.75 = 7.5, ceil = 8
        assert_eq!(estimator.estimate_missing_attribute("kitchen"), Some(Decimal::from(8)));
    }

    #[test]
    fn unknown_weights_and_categories_are_not_sampled() {
        let products = vec![
            product(None, Some("toy")),
            product(Some("2"), None),
        ];
        let estimator = CategoryMaxWeightEstimator::from_products(&products);
        assert!(estimator.is_empty());
        assert_eq!(estimator.estimate_missing_attribute("toy"), None);
    }

    #[test]
    fn categories_are_independent() {
        let products = vec![
            product(Some("1.0"), Some("a")),
            product(Some("6.5"), Some("b")),
        ];
        let estimator = CategoryMaxWeightEstimator::from_products(&products);
        assert_eq!(estimator.len(), 2);
        assert_eq!(estimator.estimate_missing_attribute("a"), Some(Decimal::from(1)));
        assert_eq!(estimator.estimate_missing_attribute("b"), Some(Decimal::from(7)));
    }
}
