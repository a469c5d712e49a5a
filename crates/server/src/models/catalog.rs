//! Marketplace catalog types.

use serde::{Deserialize, Serialize};

use beverly_core::Price;

/// A read-only marketplace listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image: String,
    pub author: String,
    pub rating: f64,
    pub sales: u64,
}

/// Listing order for the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Most sales first.
    Popular,
    /// Highest rating first.
    Rating,
}

impl SortOrder {
    /// Parse the `sort` query value. Unknown values mean "catalog order".
    #[must_use]
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "price-low" => Some(Self::PriceLow),
            "price-high" => Some(Self::PriceHigh),
            "popular" => Some(Self::Popular),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

/// Query parameters for `GET /api/marketplace`, echoed back as `filters`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Exact category; `all` or absent disables the filter.
    pub category: Option<String>,
    /// Case-insensitive substring over title, description and author.
    pub search: Option<String>,
    /// One of `price-low`, `price-high`, `popular`, `rating`.
    pub sort: Option<String>,
}

impl CatalogFilter {
    /// The category to filter on, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "all")
    }

    /// The lowercased search needle, if any.
    #[must_use]
    pub fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// The requested sort order, if recognised.
    #[must_use]
    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort.as_deref().and_then(SortOrder::from_query)
    }
}
