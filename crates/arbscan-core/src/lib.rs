pub mod app_config;
pub mod config;
pub mod pairing;
pub mod products;
pub mod sales_ranks;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use pairing::{pair_by_key, pair_by_key_with_stats, JoinStats, Paired};
pub use products::{
    AmazonProduct, ProductPair, SalesRank, WalmartProduct, DEFAULT_CATEGORY_IDS,
    DEFAULT_SPECIAL_FEEDS,
};
pub use sales_ranks::{load_sales_ranks, SalesRankThresholds};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sales ranks file {path}: {source}")]
    SalesRanksFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sales ranks file: {0}")]
    SalesRanksFileParse(#[source] serde_yaml::Error),

    #[error("sales ranks validation error: {0}")]
    Validation(String),
}
