use arbscan_core::{AmazonProduct, Paired, SalesRank, WalmartProduct};

use super::*;
use crate::estimator::CategoryMaxWeightEstimator;
use crate::types::{CostModel, RoiData};

fn analyzed(upc: &str, gc_dollar: i64, gc_percent: Option<i64>, group: Option<&str>, rank: Option<u64>) -> AnalyzedProduct {
    let roi = RoiData {
        total_cost: Decimal::new(1_000, 2),
        dollar_roi: Decimal::new(gc_dollar, 2),
        percent_roi: gc_percent,
    };
    AnalyzedProduct {
        pair: Paired {
            left: WalmartProduct {
                item_id: upc.to_string(),
                upc: upc.to_string(),
                name: String::new(),
                brand_name: None,
                price: Decimal::new(1_000, 2),
                msrp: None,
                standard_ship_rate: None,
                free_shipping_threshold: None,
                stock: None,
                product_url: None,
            },
            right: AmazonProduct {
                asin: format!("B-{upc}"),
                lookup_id: upc.to_string(),
                brand: None,
                title: String::new(),
                product_group: group.map(str::to_string),
                list_price: None,
                landed_price: None,
                weight_pounds: None,
                weight_estimated: false,
                best_sales_rank: rank.map(|rank| SalesRank {
                    category_id: "cat".to_string(),
                    rank,
                }),
            },
        },
        fba_cost: Decimal::ZERO,
        total_paid: Decimal::new(1_000, 2),
        base: roi,
        gift_card: roi,
    }
}

fn upcs(products: &[AnalyzedProduct]) -> Vec<&str> {
    products.iter().map(AnalyzedProduct::upc).collect()
}

#[test]
fn roi_filter_dollar_minimum_is_exclusive() {
    let filter = RoiFilter {
        min_dollar_roi: Decimal::ZERO,
        min_percent_roi: 0,
    };
    let kept = filter.apply(vec![
        analyzed("a", 0, Some(0), None, None),
        analyzed("b", 1, Some(0), None, None),
        analyzed("c", -50, Some(-5), None, None),
    ]);
    assert_eq!(upcs(&kept), vec!["b"]);
}

#[test]
fn roi_filter_percent_minimum_is_inclusive() {
    let filter = RoiFilter {
        min_dollar_roi: Decimal::ZERO,
        min_percent_roi: 15,
    };
    let kept = filter.apply(vec![
        analyzed("a", 500, Some(14), None, None),
        analyzed("b", 500, Some(15), None, None),
        analyzed("c", 500, None, None, None),
    ]);
    assert_eq!(upcs(&kept), vec!["b", "c"]);
}

#[test]
fn sales_rank_filter_applies_group_threshold() {
    let filter = SalesRankFilter::new(SalesRankThresholds::from_pairs([("Toy", 1_000u64)]));
    let kept = filter.apply(vec![
        analyzed("under", 100, Some(10), Some("Toy"), Some(999)),
        analyzed("at", 100, Some(10), Some("Toy"), Some(1_000)),
        analyzed("over", 100, Some(10), Some("Toy"), Some(1_001)),
    ]);
    assert_eq!(upcs(&kept), vec!["under", "at"]);
}

#[test]
fn sales_rank_filter_keeps_unknowns_for_review() {
    let filter = SalesRankFilter::new(SalesRankThresholds::from_pairs([("Toy", 10u64)]));
    let kept = filter.apply(vec![
        analyzed("no-group", 100, Some(10), None, Some(5_000)),
        analyzed("no-threshold", 100, Some(10), Some("Kitchen"), Some(5_000)),
        analyzed("no-rank", 100, Some(10), Some("Toy"), None),
    ]);
    assert_eq!(upcs(&kept), vec!["no-group", "no-threshold", "no-rank"]);
}

#[test]
fn chain_runs_stages_in_order() {
    let chain = FilterChain::new()
        .with_stage(RoiFilter {
            min_dollar_roi: Decimal::ZERO,
            min_percent_roi: 0,
        })
        .with_stage(SalesRankFilter::new(SalesRankThresholds::from_pairs([(
            "Toy", 100u64,
        )])));
    assert_eq!(chain.stage_names(), vec!["roi", "sales_rank"]);

    let kept = chain.run(vec![
        analyzed("keep", 200, Some(20), Some("Toy"), Some(50)),
        analyzed("unprofitable", -100, Some(-10), Some("Toy"), Some(50)),
        analyzed("unpopular", 200, Some(20), Some("Toy"), Some(5_000)),
        analyzed("keep-too", 300, Some(30), None, None),
    ]);
    assert_eq!(upcs(&kept), vec!["keep", "keep-too"]);
}

#[test]
fn empty_chain_passes_everything_through() {
    let kept = FilterChain::new().run(vec![analyzed("a", -1, None, None, None)]);
    assert_eq!(kept.len(), 1);
}

#[test]
fn run_pairs_costs_before_filtering() {
    let mut priced = analyzed("priced", 0, None, Some("Toy"), Some(50)).pair;
    priced.right.list_price = Some(Decimal::new(4_000, 2));
    priced.right.weight_pounds = Some(Decimal::ONE);
    let mut unpriced = analyzed("unpriced", 0, None, Some("Toy"), Some(50)).pair;
    unpriced.right.list_price = None;
    let mut unprofitable = analyzed("unprofitable", 0, None, Some("Toy"), Some(50)).pair;
    unprofitable.right.list_price = Some(Decimal::ONE);
    unprofitable.right.weight_pounds = Some(Decimal::ONE);

    let chain = FilterChain::new().with_stage(RoiFilter {
        min_dollar_roi: Decimal::ZERO,
        min_percent_roi: 0,
    });
    let kept = chain.run_pairs(
        vec![priced, unpriced, unprofitable],
        &CostModel::default(),
        &CategoryMaxWeightEstimator::default(),
    );
    assert_eq!(upcs(&kept), vec!["priced"]);
    assert_eq!(kept[0].total_paid, Decimal::new(1_060, 2));
}
