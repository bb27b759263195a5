use std::fmt;
use std::str::FromStr;

use crate::error::WalmartError;

/// Special-offer feeds exposed both as `/v1/feeds/{feed}` and as the
/// `specialOffer` filter of the paginated items endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialFeed {
    BestSellers,
    Clearance,
    PreOrder,
    Rollback,
    SpecialBuy,
}

impl SpecialFeed {
    pub const ALL: [SpecialFeed; 5] = [
        SpecialFeed::BestSellers,
        SpecialFeed::Clearance,
        SpecialFeed::PreOrder,
        SpecialFeed::Rollback,
        SpecialFeed::SpecialBuy,
    ];

    /// Wire name used in both the feed path and the `specialOffer` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialFeed::BestSellers => "bestsellers",
            SpecialFeed::Clearance => "clearance",
            SpecialFeed::PreOrder => "preorder",
            SpecialFeed::Rollback => "rollback",
            SpecialFeed::SpecialBuy => "specialbuy",
        }
    }

    /// Parses a list of wire names, e.g. from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WalmartError::UnknownFeed`] for the first unrecognised name.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<SpecialFeed>, WalmartError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl fmt::Display for SpecialFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecialFeed {
    type Err = WalmartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SpecialFeed::ALL
            .into_iter()
            .find(|feed| feed.as_str() == wanted)
            .ok_or_else(|| WalmartError::UnknownFeed(s.to_string()))
    }
}

/// Filters for `GET /v1/paginated/items`. Unset filters are omitted from the
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsQuery {
    pub category_id: Option<String>,
    pub special_offer: Option<SpecialFeed>,
    pub brand: Option<String>,
}

impl ItemsQuery {
    #[must_use]
    pub fn category_feed(category_id: &str, feed: SpecialFeed) -> Self {
        Self {
            category_id: Some(category_id.to_string()),
            special_offer: Some(feed),
            brand: None,
        }
    }

    /// Restricts the query to one brand; `None` leaves it unfiltered.
    #[must_use]
    pub fn with_brand(mut self, brand: Option<&str>) -> Self {
        self.brand = brand.map(str::to_string);
        self
    }

    /// Query pairs in the order the API documents them.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category_id {
            params.push(("category", category.clone()));
        }
        if let Some(feed) = self.special_offer {
            params.push(("specialOffer", feed.as_str().to_string()));
        }
        if let Some(brand) = &self.brand {
            params.push(("brand", brand.clone()));
        }
        params
    }
}

impl fmt::Display for ItemsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .params()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        if parts.is_empty() {
            f.write_str("all items")
        } else {
            f.write_str(&parts.join("&"))
        }
    }
}
