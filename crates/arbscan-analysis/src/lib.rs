//! Profitability analysis over paired Walmart/Amazon products.
//!
//! [`FilterChain::run_pairs`] first costs each [`arbscan_core::ProductPair`]
//! into an [`AnalyzedProduct`] with base and gift-card ROI figures (see
//! [`analyze_costs`]), then narrows the result through its
//! [`FilterStage`]s, run strictly in order.

pub mod cost;
pub mod estimator;
pub mod filter;
pub mod types;

pub use cost::{analyze_costs, round2};
pub use estimator::{CategoryMaxWeightEstimator, MissingAttributeEstimator};
pub use filter::{FilterChain, FilterStage, RoiFilter, SalesRankFilter};
pub use types::{AnalyzedProduct, CostModel, RoiData};
