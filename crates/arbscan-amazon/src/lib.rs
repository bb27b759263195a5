//! Amazon product lookup client.
//!
//! Matches retailer identifiers (UPCs) to marketplace products and fetches
//! lowest landed offers per ASIN, both through the shared batch scheduler.
//! Credentials travel as query parameters; request signing is not performed.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{
    apply_lowest_offers, AmazonClient, AmazonCredentials, DEFAULT_BASE_URL,
    LOWEST_OFFER_BATCH_SIZE, MATCHING_BATCH_SIZE,
};
pub use error::AmazonError;
pub use types::{IdMatch, IdType, LowestOffer, MatchResult};
