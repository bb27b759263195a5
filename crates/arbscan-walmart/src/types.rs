//! Walmart catalog API response types.
//!
//! ## Observed shapes
//!
//! ### Item-bearing endpoints
//! `/v1/paginated/items`, `/v1/feeds/{feed}`, `/v1/trends` and `/v1/items`
//! all wrap their results in an `items` array. Paginated responses add a
//! `nextPage` path (relative to the API host) while more pages remain.
//! Throttled or rejected requests sometimes come back as a 200 with an
//! `errors` array and no `items` key at all, so `items` is optional here and
//! [`RawItemsResponse::into_payload`] decides whether the body is usable.
//!
//! ### Prices
//! `salePrice` and `msrp` are JSON numbers and either may be absent.
//!
//! ### `upc`
//! A string; missing on marketplace and bundle items.
//!
//! ### Free shipping
//! Older responses carry `freeShippingOver50Dollars`, newer ones
//! `freeShippingOver35Dollars`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawItemsResponse {
    #[serde(default)]
    pub items: Option<Vec<RawItem>>,

    #[serde(default, rename = "nextPage")]
    pub next_page: Option<String>,

    #[serde(default)]
    pub errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Validated body of an item-bearing response.
#[derive(Debug)]
pub enum ItemsPayload {
    Items {
        items: Vec<RawItem>,
        next_page: Option<String>,
    },
    /// The body parsed but carried no `items` array.
    Unusable { reason: String },
}

impl RawItemsResponse {
    #[must_use]
    pub fn into_payload(self) -> ItemsPayload {
        match self.items {
            Some(items) => ItemsPayload::Items {
                items,
                next_page: self.next_page.filter(|p| !p.trim().is_empty()),
            },
            None if self.errors.is_empty() => ItemsPayload::Unusable {
                reason: "response has no items".to_string(),
            },
            None => ItemsPayload::Unusable {
                reason: self
                    .errors
                    .iter()
                    .map(|e| {
                        format!(
                            "{}: {}",
                            e.code.map_or_else(|| "?".to_string(), |c| c.to_string()),
                            e.message.as_deref().unwrap_or("unknown error")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
            },
        }
    }
}

/// One page of items after validation.
#[derive(Debug)]
pub struct ItemsPage {
    pub items: Vec<RawItem>,
    pub next_page: Option<String>,
}

/// A catalog item as returned by the API.
#[derive(Debug, Deserialize)]
pub struct RawItem {
    #[serde(rename = "itemId")]
    pub item_id: i64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub upc: Option<String>,

    #[serde(default, rename = "brandName")]
    pub brand_name: Option<String>,

    #[serde(default, rename = "salePrice")]
    pub sale_price: Option<f64>,

    #[serde(default)]
    pub msrp: Option<f64>,

    #[serde(default, rename = "standardShipRate")]
    pub standard_ship_rate: Option<f64>,

    #[serde(default, rename = "freeShippingOver35Dollars")]
    pub free_shipping_over_35: Option<bool>,

    #[serde(default, rename = "freeShippingOver50Dollars")]
    pub free_shipping_over_50: Option<bool>,

    #[serde(default)]
    pub stock: Option<String>,

    #[serde(default, rename = "availableOnline")]
    pub available_online: bool,

    #[serde(default, rename = "productUrl")]
    pub product_url: Option<String>,
}

/// Response from `GET /v1/taxonomy`.
#[derive(Debug, Deserialize)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Slash-separated path from the root, e.g. `"Toys/Games/Puzzles"`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub children: Vec<Category>,
}

/// A category with no children, reached by walking the taxonomy tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLeaf {
    pub id: String,
    pub path: String,
}

impl Taxonomy {
    /// Depth-first walk returning every leaf category.
    ///
    /// A top-level category with no children is itself a leaf. When the API
    /// omits `path`, the leaf's name is used.
    #[must_use]
    pub fn leaf_categories(&self) -> Vec<CategoryLeaf> {
        let mut leaves = Vec::new();
        for category in &self.categories {
            collect_leaves(category, &mut leaves);
        }
        leaves
    }
}

fn collect_leaves(category: &Category, out: &mut Vec<CategoryLeaf>) {
    if category.children.is_empty() {
        out.push(CategoryLeaf {
            id: category.id.clone(),
            path: category
                .path
                .clone()
                .unwrap_or_else(|| category.name.clone()),
        });
        return;
    }
    for child in &category.children {
        collect_leaves(child, out);
    }
}
