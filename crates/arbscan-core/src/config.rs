use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
use crate::products::{DEFAULT_CATEGORY_IDS, DEFAULT_SPECIAL_FEEDS};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does not load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are optional here; commands that need them check for their
/// presence before building a client.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or is out
/// of range.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_decimal = |var: &str, default: &str| -> Result<Decimal, ConfigError> {
        let raw = or_default(var, default);
        Decimal::from_str(&raw).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_list = |var: &str, default: &[&str]| -> Vec<String> {
        match optional(var) {
            Some(raw) => split_list(&raw),
            None => default.iter().map(|s| (*s).to_string()).collect(),
        }
    };

    let env = parse_environment(&or_default("ARBSCAN_ENV", "development"))?;
    let log_level = or_default("ARBSCAN_LOG_LEVEL", "info");

    let walmart_api_key = optional("WALMART_API_KEY");
    let walmart_base_url = or_default("ARBSCAN_WALMART_BASE_URL", "http://api.walmartlabs.com");

    let amazon_access_key = optional("AMAZON_ACCESS_KEY");
    let amazon_secret_key = optional("AMAZON_SECRET_KEY");
    let amazon_seller_id = optional("AMAZON_SELLER_ID");
    let amazon_base_url = or_default("ARBSCAN_AMAZON_BASE_URL", "https://mws.amazonservices.com");
    let amazon_marketplace_id = or_default("ARBSCAN_AMAZON_MARKETPLACE_ID", "ATVPDKIKX0DER");

    let request_timeout_secs = parse_u64("ARBSCAN_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ARBSCAN_USER_AGENT", "arbscan/0.1 (price-comparison)");
    let walmart_interval_ms = parse_u64("ARBSCAN_WALMART_INTERVAL_MS", "500")?;
    let amazon_interval_ms = parse_u64("ARBSCAN_AMAZON_INTERVAL_MS", "500")?;
    let max_pages = parse_usize("ARBSCAN_MAX_PAGES", "50")?;

    let category_ids = parse_list("ARBSCAN_CATEGORY_IDS", DEFAULT_CATEGORY_IDS);
    let special_feeds = parse_list("ARBSCAN_SPECIAL_FEEDS", DEFAULT_SPECIAL_FEEDS);

    let output_dir = PathBuf::from(or_default("ARBSCAN_OUTPUT_DIR", "./output"));
    let sales_ranks_path = PathBuf::from(or_default(
        "ARBSCAN_SALES_RANKS_PATH",
        "./config/sales_ranks.yaml",
    ));

    let fba_cost_per_pound = parse_decimal("ARBSCAN_FBA_COST_PER_POUND", "0.50")?;
    let tax_rate = parse_decimal("ARBSCAN_TAX_RATE", "0.06")?;
    let gift_card_rate = parse_decimal("ARBSCAN_GIFT_CARD_RATE", "0.98")?;
    let min_dollar_roi = parse_decimal("ARBSCAN_MIN_DOLLAR_ROI", "0.00")?;
    let min_percent_roi = parse_i64("ARBSCAN_MIN_PERCENT_ROI", "0")?;

    if gift_card_rate <= Decimal::ZERO || gift_card_rate > Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar {
            var: "ARBSCAN_GIFT_CARD_RATE".to_string(),
            reason: format!("{gift_card_rate} is outside (0, 1]"),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        walmart_api_key,
        walmart_base_url,
        amazon_access_key,
        amazon_secret_key,
        amazon_seller_id,
        amazon_base_url,
        amazon_marketplace_id,
        request_timeout_secs,
        user_agent,
        walmart_interval_ms,
        amazon_interval_ms,
        max_pages,
        category_ids,
        special_feeds,
        output_dir,
        sales_ranks_path,
        fba_cost_per_pound,
        tax_rate,
        gift_card_rate,
        min_dollar_roi,
        min_percent_roi,
    })
}

/// Split a comma-separated env value into trimmed, non-empty entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ARBSCAN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
