//! Command handlers: fetch from Walmart, match on Amazon, analyze, write.
//!
//! Batch failures inside a fetch are absorbed by the clients and reported as
//! `fulfilled/requested` counts. Only setup problems (missing credentials,
//! bad overrides, nothing to match) abort a command.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use arbscan_amazon::{apply_lowest_offers, AmazonClient, AmazonCredentials, IdType};
use arbscan_analysis::{
    AnalyzedProduct, CategoryMaxWeightEstimator, CostModel, FilterChain, RoiFilter,
    SalesRankFilter,
};
use arbscan_core::{
    load_sales_ranks, pair_by_key_with_stats, AmazonProduct, AppConfig, ProductPair,
    WalmartProduct,
};
use arbscan_walmart::{SpecialFeed, WalmartClient};

use crate::report;
use crate::FetchArgs;

fn walmart_client(config: &AppConfig) -> anyhow::Result<WalmartClient> {
    let api_key = config
        .walmart_api_key
        .as_deref()
        .context("WALMART_API_KEY is not set")?;
    Ok(WalmartClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.walmart_base_url,
    )?)
}

fn amazon_client(config: &AppConfig) -> anyhow::Result<AmazonClient> {
    let credentials = AmazonCredentials::from_parts(
        config.amazon_access_key.as_deref(),
        config.amazon_seller_id.as_deref(),
        &config.amazon_marketplace_id,
    )?;
    Ok(AmazonClient::with_base_url(
        credentials,
        config.request_timeout_secs,
        &config.user_agent,
        &config.amazon_base_url,
    )?)
}

/// Keeps the first copy of each Walmart item. The same listing routinely
/// appears in several feeds. Distinct items sharing a UPC are kept and left
/// for pairing to drop as ambiguous.
fn dedupe_by_item_id(items: Vec<WalmartProduct>) -> Vec<WalmartProduct> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.item_id.clone()))
        .collect()
}

/// Resolves categories and feeds from overrides, falling back to config.
fn feed_plan(config: &AppConfig, args: &FetchArgs) -> anyhow::Result<(Vec<String>, Vec<SpecialFeed>, usize)> {
    let categories = if args.categories.is_empty() {
        config.category_ids.clone()
    } else {
        args.categories.clone()
    };
    let feed_names = if args.feeds.is_empty() {
        &config.special_feeds
    } else {
        &args.feeds
    };
    let feeds = SpecialFeed::parse_list(feed_names)?;
    if categories.is_empty() || feeds.is_empty() {
        anyhow::bail!("at least one category and one special feed are required");
    }
    Ok((categories, feeds, args.max_pages.unwrap_or(config.max_pages)))
}

async fn fetch_walmart_items(config: &AppConfig, args: &FetchArgs) -> anyhow::Result<Vec<WalmartProduct>> {
    let (categories, feeds, max_pages) = feed_plan(config, args)?;
    let client = walmart_client(config)?;
    let interval = Duration::from_millis(config.walmart_interval_ms);

    let outcome = client
        .fetch_special_feeds(&categories, &feeds, args.brand.as_deref(), max_pages, interval)
        .await?;
    println!("walmart feeds: {outcome}");

    let items = dedupe_by_item_id(outcome.records);
    tracing::info!(unique_items = items.len(), "walmart items collected");
    Ok(items)
}

/// Matches Walmart UPCs on Amazon, prices the matches with lowest offers,
/// and pairs them one-to-one with the Walmart items.
async fn match_on_amazon(config: &AppConfig, items: Vec<WalmartProduct>) -> anyhow::Result<Vec<ProductPair>> {
    let upcs: Vec<String> = items.iter().map(|i| i.upc.clone()).collect();
    if upcs.is_empty() {
        anyhow::bail!("no Walmart items with a UPC to match");
    }

    let client = amazon_client(config)?;
    let interval = Duration::from_millis(config.amazon_interval_ms);

    let matched = client.matching_products(&upcs, IdType::Upc, interval).await?;
    println!("amazon matching: {matched}");

    let asins: Vec<String> = matched.records.iter().map(|p| p.asin.clone()).collect();
    let offers = client.lowest_offers(&asins, interval).await?;
    println!("amazon lowest offers: {offers}");
    let products = apply_lowest_offers(matched.records, offers.records);

    let (pairs, stats) = pair_by_key_with_stats(
        items,
        products,
        |w: &WalmartProduct| w.upc.clone(),
        |a: &AmazonProduct| a.lookup_id.clone(),
    );
    tracing::info!(
        walmart = stats.left,
        amazon = stats.right,
        paired = stats.paired,
        unmatched = stats.unmatched,
        ambiguous = stats.ambiguous,
        "paired by UPC"
    );
    println!("paired {} of {} Walmart items", stats.paired, stats.left);
    Ok(pairs)
}

fn analyze(config: &AppConfig, pairs: Vec<ProductPair>) -> anyhow::Result<Vec<AnalyzedProduct>> {
    let thresholds = load_sales_ranks(&config.sales_ranks_path)?;
    let estimator = CategoryMaxWeightEstimator::from_products(pairs.iter().map(|p| &p.right));
    tracing::debug!(categories = estimator.len(), "weight estimates built");

    let chain = FilterChain::new()
        .with_stage(RoiFilter {
            min_dollar_roi: config.min_dollar_roi,
            min_percent_roi: config.min_percent_roi,
        })
        .with_stage(SalesRankFilter::new(thresholds));
    Ok(chain.run_pairs(pairs, &CostModel::from_config(config), &estimator))
}

/// # Errors
///
/// Returns an error if the taxonomy cannot be fetched or the file written.
pub(crate) async fn run_categories(config: &AppConfig, leaves: bool) -> anyhow::Result<()> {
    let client = walmart_client(config)?;
    let taxonomy = client.taxonomy().await.context("fetch Walmart taxonomy")?;

    let rows: Vec<(String, String)> = if leaves {
        taxonomy
            .leaf_categories()
            .into_iter()
            .map(|leaf| (leaf.id, leaf.path))
            .collect()
    } else {
        taxonomy
            .categories
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect()
    };

    let path = report::write_categories(&config.output_dir, &rows)?;
    println!("wrote {} categories to {}", rows.len(), path.display());
    Ok(())
}

/// # Errors
///
/// Returns an error on invalid overrides, a missing API key, or a write
/// failure.
pub(crate) async fn run_feeds(config: &AppConfig, args: &FetchArgs) -> anyhow::Result<()> {
    let items = fetch_walmart_items(config, args).await?;
    let path = report::write_walmart_items(&config.output_dir, &items)?;
    println!("wrote {} items to {}", items.len(), path.display());
    Ok(())
}

/// # Errors
///
/// Returns an error on a missing API key or a write failure.
pub(crate) async fn run_lookup(config: &AppConfig, ids: &[String]) -> anyhow::Result<()> {
    let client = walmart_client(config)?;
    let interval = Duration::from_millis(config.walmart_interval_ms);
    let outcome = client.lookup_items(ids, interval).await?;
    println!("walmart lookup: {outcome}");

    let path = report::write_walmart_items(&config.output_dir, &outcome.records)?;
    println!("wrote {} items to {}", outcome.records.len(), path.display());
    Ok(())
}

/// # Errors
///
/// Returns an error on invalid overrides, missing credentials, an empty UPC
/// list, or a write failure.
pub(crate) async fn run_match(config: &AppConfig, args: &FetchArgs) -> anyhow::Result<()> {
    let items = fetch_walmart_items(config, args).await?;
    report::write_walmart_items(&config.output_dir, &items)?;

    let pairs = match_on_amazon(config, items).await?;
    let path = report::write_pairs(&config.output_dir, &pairs)?;
    println!("wrote {} pairs to {}", pairs.len(), path.display());
    Ok(())
}

/// # Errors
///
/// Same as [`run_match`], plus an unreadable sales-rank file.
pub(crate) async fn run_analyze(config: &AppConfig, args: &FetchArgs) -> anyhow::Result<()> {
    // Fail on a bad threshold file before spending any API quota.
    load_sales_ranks(&config.sales_ranks_path)?;

    let items = fetch_walmart_items(config, args).await?;
    report::write_walmart_items(&config.output_dir, &items)?;

    let pairs = match_on_amazon(config, items).await?;
    report::write_pairs(&config.output_dir, &pairs)?;

    let kept = analyze(config, pairs)?;
    let path = report::write_analyzed(&config.output_dir, &kept)?;
    println!("wrote {} profitable products to {}", kept.len(), path.display());
    Ok(())
}
