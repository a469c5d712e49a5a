//! Marketplace catalog.
//!
//! The listing is fixed at startup and read-only afterwards, so no locking
//! is needed.

use beverly_core::Price;

use crate::models::catalog::{CatalogFilter, CatalogItem, SortOrder};

/// Read-only marketplace listing.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Create a catalog from a fixed list of items.
    #[must_use]
    pub const fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// The built-in marketplace listing.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_items())
    }

    /// Filter and sort the listing.
    ///
    /// Sorting is stable, so items that compare equal keep catalog order.
    #[must_use]
    pub fn list(&self, filter: &CatalogFilter) -> Vec<CatalogItem> {
        let category = filter.category();
        let needle = filter.search_needle();

        let mut items: Vec<CatalogItem> = self
            .items
            .iter()
            .filter(|item| category.is_none_or(|c| item.category == c))
            .filter(|item| {
                needle.as_deref().is_none_or(|n| {
                    item.title.to_lowercase().contains(n)
                        || item.description.to_lowercase().contains(n)
                        || item.author.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();

        match filter.sort_order() {
            Some(SortOrder::PriceLow) => items.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(SortOrder::PriceHigh) => items.sort_by(|a, b| b.price.cmp(&a.price)),
            Some(SortOrder::Popular) => items.sort_by(|a, b| b.sales.cmp(&a.sales)),
            Some(SortOrder::Rating) => items.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            None => {}
        }

        items
    }

    /// Get an item by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units sold across all items.
    #[must_use]
    pub fn total_sales(&self) -> u64 {
        self.items.iter().map(|item| item.sales).sum()
    }

    /// Total revenue (price × sales) across all items.
    #[must_use]
    pub fn total_revenue(&self) -> Price {
        self.items.iter().map(|item| item.price * item.sales).sum()
    }
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    title: &str,
    description: &str,
    cents: i64,
    category: &str,
    image: &str,
    author: &str,
    rating: f64,
    sales: u64,
) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price: Price::from_cents(cents),
        category: category.to_string(),
        image: image.to_string(),
        author: author.to_string(),
        rating,
        sales,
    }
}

#[allow(clippy::too_many_lines)]
fn seed_items() -> Vec<CatalogItem> {
    vec![
        item(
            "1",
            "AI Content Generator",
            "Advanced AI tool for generating marketing content, blog posts, and social media copy with SEO optimization.",
            4999,
            "ai-tools",
            "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=400",
            "Beverly Tech",
            4.8,
            1240,
        ),
        item(
            "2",
            "Neural Network Visualizer",
            "Interactive 3D visualization tool for neural networks. Perfect for education and presentations.",
            2999,
            "visualization",
            "https://images.unsplash.com/photo-1620712943543-bcc4688e7485?w=400",
            "DevTeam Alpha",
            4.6,
            856,
        ),
        item(
            "3",
            "Chatbot Framework",
            "Complete chatbot framework with NLP capabilities, multi-language support, and easy integration.",
            7999,
            "frameworks",
            "https://images.unsplash.com/photo-1531746790731-6c087fecd65a?w=400",
            "Beverly Tech",
            4.9,
            2103,
        ),
        item(
            "4",
            "Data Analysis Suite",
            "Comprehensive data analysis tools with AI-powered insights and automated reporting.",
            9999,
            "analytics",
            "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=400",
            "DataPros",
            4.7,
            634,
        ),
        item(
            "5",
            "AI Image Enhancer",
            "Professional-grade AI image upscaling and enhancement. Restore old photos or improve quality.",
            3999,
            "ai-tools",
            "https://images.unsplash.com/photo-1563089145-599997674d42?w=400",
            "PixelPerfect",
            4.5,
            3421,
        ),
        item(
            "6",
            "Voice Recognition API",
            "Real-time speech-to-text with 99% accuracy. Supports 50+ languages and accents.",
            5999,
            "api",
            "https://images.unsplash.com/photo-1589254065878-42c9da997008?w=400",
            "VoiceAI Labs",
            4.8,
            987,
        ),
    ]
}
