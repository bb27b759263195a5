//! Amazon product API response types.
//!
//! Both product endpoints wrap per-identifier results in a top-level
//! `results` array, one entry per requested id in request order. A body
//! without `results` (throttling pages, gateway errors rendered as 200) is
//! treated as unusable for the whole batch.
//!
//! Money amounts arrive as decimal strings (`"19.99"`) and are parsed straight
//! into `Decimal`.

use std::fmt;

use arbscan_core::AmazonProduct;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Identifier kinds accepted by the matching endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    Asin,
    Ean,
    Isbn,
    Jan,
    SellerSku,
    Upc,
}

impl IdType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IdType::Asin => "ASIN",
            IdType::Ean => "EAN",
            IdType::Isbn => "ISBN",
            IdType::Jan => "JAN",
            IdType::SellerSku => "SellerSKU",
            IdType::Upc => "UPC",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct RawMatchingResponse {
    #[serde(default)]
    pub results: Option<Vec<RawMatchResult>>,
}

#[derive(Debug, Deserialize)]
pub struct RawMatchResult {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub products: Vec<RawProduct>,
    #[serde(default)]
    pub error: Option<RawApiError>,
}

#[derive(Debug, Deserialize)]
pub struct RawApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawProduct {
    pub asin: String,
    /// Missing when the marketplace returns a bare identifier, which happens
    /// for suppressed listings and under heavy throttling.
    #[serde(default)]
    pub attributes: Option<RawAttributes>,
    #[serde(default, rename = "salesRankings")]
    pub sales_rankings: Vec<RawSalesRank>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttributes {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub product_group: Option<String>,
    #[serde(default)]
    pub list_price: Option<RawMoney>,
    #[serde(default)]
    pub package_dimensions: Option<RawDimensions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoney {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawDimensions {
    #[serde(default)]
    pub weight: Option<RawMeasure>,
}

#[derive(Debug, Deserialize)]
pub struct RawMeasure {
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
    pub units: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSalesRank {
    pub product_category_id: String,
    pub rank: u64,
}

/// Outcome of matching one identifier.
#[derive(Debug, Clone)]
pub enum MatchResult {
    /// Exactly one product with a usable attribute set.
    Single(Box<AmazonProduct>),
    /// Several products share the identifier; never paired.
    Multiple(usize),
    NoMatch,
    /// The marketplace rejected this identifier.
    Failed(String),
}

/// One requested identifier with its match outcome.
#[derive(Debug, Clone)]
pub struct IdMatch {
    pub id: String,
    pub result: MatchResult,
}

#[derive(Debug, Deserialize)]
pub struct RawLowestOffersResponse {
    #[serde(default)]
    pub results: Option<Vec<RawOfferResult>>,
}

#[derive(Debug, Deserialize)]
pub struct RawOfferResult {
    pub asin: String,
    pub status: String,
    #[serde(default)]
    pub listings: Vec<RawListing>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub landed_price: RawMoney,
}

/// Cheapest current offer for one ASIN, shipping included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowestOffer {
    pub asin: String,
    pub landed_price: Decimal,
}
