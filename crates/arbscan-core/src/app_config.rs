use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub walmart_api_key: Option<String>,
    pub walmart_base_url: String,
    pub amazon_access_key: Option<String>,
    pub amazon_secret_key: Option<String>,
    pub amazon_seller_id: Option<String>,
    pub amazon_base_url: String,
    pub amazon_marketplace_id: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Stagger between consecutive Walmart batch requests.
    pub walmart_interval_ms: u64,
    /// Stagger between consecutive Amazon batch requests.
    pub amazon_interval_ms: u64,
    /// Upper bound on `nextPage` hops per feed/category query.
    pub max_pages: usize,
    pub category_ids: Vec<String>,
    pub special_feeds: Vec<String>,
    pub output_dir: PathBuf,
    pub sales_ranks_path: PathBuf,
    pub fba_cost_per_pound: Decimal,
    pub tax_rate: Decimal,
    pub gift_card_rate: Decimal,
    pub min_dollar_roi: Decimal,
    pub min_percent_roi: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "walmart_api_key",
                &self.walmart_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("walmart_base_url", &self.walmart_base_url)
            .field(
                "amazon_access_key",
                &self.amazon_access_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "amazon_secret_key",
                &self.amazon_secret_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "amazon_seller_id",
                &self.amazon_seller_id.as_ref().map(|_| "[redacted]"),
            )
            .field("amazon_base_url", &self.amazon_base_url)
            .field("amazon_marketplace_id", &self.amazon_marketplace_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("walmart_interval_ms", &self.walmart_interval_ms)
            .field("amazon_interval_ms", &self.amazon_interval_ms)
            .field("max_pages", &self.max_pages)
            .field("category_ids", &self.category_ids.len())
            .field("special_feeds", &self.special_feeds)
            .field("output_dir", &self.output_dir)
            .field("sales_ranks_path", &self.sales_ranks_path)
            .field("fba_cost_per_pound", &self.fba_cost_per_pound)
            .field("tax_rate", &self.tax_rate)
            .field("gift_card_rate", &self.gift_card_rate)
            .field("min_dollar_roi", &self.min_dollar_roi)
            .field("min_percent_roi", &self.min_percent_roi)
            .finish()
    }
}
