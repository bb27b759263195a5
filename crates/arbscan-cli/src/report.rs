//! Tab-separated output files.
//!
//! Each writer truncates its file and writes a header row followed by one
//! row per record.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use arbscan_analysis::AnalyzedProduct;
use arbscan_core::{ProductPair, WalmartProduct};
use rust_decimal::Decimal;
use serde::Serialize;

pub const WALMART_ITEMS_FILE: &str = "walmart_items.tsv";
pub const PAIRED_ITEMS_FILE: &str = "paired_items.tsv";
pub const ANALYZED_ITEMS_FILE: &str = "analyzed_items.tsv";
pub const CATEGORIES_FILE: &str = "categories.tsv";

#[derive(Serialize)]
struct WalmartRow<'a> {
    upc: &'a str,
    item_id: &'a str,
    name: &'a str,
    brand: Option<&'a str>,
    price: Decimal,
    msrp: Option<Decimal>,
    shipping: Decimal,
    stock: Option<&'a str>,
    url: Option<&'a str>,
}

#[derive(Serialize)]
struct PairRow<'a> {
    upc: &'a str,
    walmart_item_id: &'a str,
    walmart_name: &'a str,
    walmart_price: Decimal,
    asin: &'a str,
    amazon_title: &'a str,
    product_group: Option<&'a str>,
    amazon_price: Option<Decimal>,
    weight_pounds: Option<Decimal>,
    sales_rank: Option<u64>,
}

#[derive(Serialize)]
struct AnalyzedRow<'a> {
    upc: &'a str,
    asin: &'a str,
    name: &'a str,
    walmart_price: Decimal,
    amazon_price: Option<Decimal>,
    weight_pounds: Option<Decimal>,
    weight_estimated: bool,
    fba_cost: Decimal,
    base_total_cost: Decimal,
    base_dollar_roi: Decimal,
    base_percent_roi: Option<i64>,
    gift_card_total_cost: Decimal,
    gift_card_dollar_roi: Decimal,
    gift_card_percent_roi: Option<i64>,
    sales_rank: Option<u64>,
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    id: &'a str,
    name: &'a str,
}

fn write_rows<T: Serialize>(dir: &Path, file_name: &str, rows: impl IntoIterator<Item = T>) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;
    let path = dir.join(file_name);
    let file = File::create(&path).with_context(|| format!("open {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(file);
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(path)
}

/// # Errors
///
/// Returns an error if the output directory or file cannot be written.
pub fn write_walmart_items(dir: &Path, items: &[WalmartProduct]) -> anyhow::Result<PathBuf> {
    write_rows(
        dir,
        WALMART_ITEMS_FILE,
        items.iter().map(|w| WalmartRow {
            upc: &w.upc,
            item_id: &w.item_id,
            name: &w.name,
            brand: w.brand_name.as_deref(),
            price: w.price,
            msrp: w.msrp,
            shipping: w.shipping_cost(),
            stock: w.stock.as_deref(),
            url: w.product_url.as_deref(),
        }),
    )
}

/// # Errors
///
/// Returns an error if the output directory or file cannot be written.
pub fn write_pairs(dir: &Path, pairs: &[ProductPair]) -> anyhow::Result<PathBuf> {
    write_rows(
        dir,
        PAIRED_ITEMS_FILE,
        pairs.iter().map(|p| PairRow {
            upc: &p.left.upc,
            walmart_item_id: &p.left.item_id,
            walmart_name: &p.left.name,
            walmart_price: p.left.price,
            asin: &p.right.asin,
            amazon_title: &p.right.title,
            product_group: p.right.product_group.as_deref(),
            amazon_price: p.right.price(),
            weight_pounds: p.right.weight_pounds,
            sales_rank: p.right.best_sales_rank.as_ref().map(|r| r.rank),
        }),
    )
}

/// # Errors
///
/// Returns an error if the output directory or file cannot be written.
pub fn write_analyzed(dir: &Path, products: &[AnalyzedProduct]) -> anyhow::Result<PathBuf> {
    write_rows(
        dir,
        ANALYZED_ITEMS_FILE,
        products.iter().map(|a| AnalyzedRow {
            upc: a.upc(),
            asin: &a.pair.right.asin,
            name: &a.pair.left.name,
            walmart_price: a.pair.left.price,
            amazon_price: a.pair.right.price(),
            weight_pounds: a.pair.right.weight_pounds,
            weight_estimated: a.pair.right.weight_estimated,
            fba_cost: a.fba_cost,
            base_total_cost: a.base.total_cost,
            base_dollar_roi: a.base.dollar_roi,
            base_percent_roi: a.base.percent_roi,
            gift_card_total_cost: a.gift_card.total_cost,
            gift_card_dollar_roi: a.gift_card.dollar_roi,
            gift_card_percent_roi: a.gift_card.percent_roi,
            sales_rank: a.pair.right.best_sales_rank.as_ref().map(|r| r.rank),
        }),
    )
}

/// Writes `(id, name)` rows; for leaf categories `name` is the full path.
///
/// # Errors
///
/// Returns an error if the output directory or file cannot be written.
pub fn write_categories(dir: &Path, categories: &[(String, String)]) -> anyhow::Result<PathBuf> {
    write_rows(
        dir,
        CATEGORIES_FILE,
        categories.iter().map(|(id, name)| CategoryRow { id, name }),
    )
}
