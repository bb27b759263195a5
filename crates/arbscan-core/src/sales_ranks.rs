//! Per-product-group sales-rank thresholds.
//!
//! Each threshold is the rank a product must be under to sit in roughly the
//! top half of its Amazon product group. Values are loaded from
//! `config/sales_ranks.yaml`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct SalesRankEntry {
    pub product_group: String,
    pub max_rank: u64,
    /// Where the threshold was extrapolated from.
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SalesRanksFile {
    thresholds: Vec<SalesRankEntry>,
}

/// Lookup table from product group to maximum acceptable sales rank.
#[derive(Debug, Clone, Default)]
pub struct SalesRankThresholds {
    by_group: HashMap<String, u64>,
}

impl SalesRankThresholds {
    /// Builds a table directly from `(group, max_rank)` pairs.
    #[must_use]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            by_group: pairs.into_iter().map(|(g, r)| (g.into(), r)).collect(),
        }
    }

    /// Threshold for `product_group`, if one is configured.
    #[must_use]
    pub fn max_rank(&self, product_group: &str) -> Option<u64> {
        self.by_group.get(product_group).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_group.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_group.is_empty()
    }
}

/// Load and validate sales-rank thresholds from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sales_ranks(path: &Path) -> Result<SalesRankThresholds, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::SalesRanksFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
    parse_sales_ranks(&content)
}

fn parse_sales_ranks(content: &str) -> Result<SalesRankThresholds, ConfigError> {
    let file: SalesRanksFile =
        serde_yaml::from_str(content).map_err(ConfigError::SalesRanksFileParse)?;

    validate_entries(&file.thresholds)?;

    tracing::debug!(groups = file.thresholds.len(), "loaded sales rank thresholds");

    Ok(SalesRankThresholds::from_pairs(
        file.thresholds
            .into_iter()
            .map(|e| (e.product_group, e.max_rank)),
    ))
}

fn validate_entries(entries: &[SalesRankEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in entries {
        if entry.product_group.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product_group must be non-empty".to_string(),
            ));
        }

        if entry.max_rank == 0 {
            return Err(ConfigError::Validation(format!(
                "product group '{}' has max_rank 0; must be positive",
                entry.product_group
            )));
        }

        if !seen.insert(entry.product_group.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product group: '{}'",
                entry.product_group
            )));
        }
    }

    Ok(())
}
