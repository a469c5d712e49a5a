//! Marketplace route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::catalog::{CatalogFilter, CatalogItem};
use crate::state::AppState;

/// Filtered listing.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub success: bool,
    pub items: Vec<CatalogItem>,
    pub count: usize,
    /// The query parameters as received; absent ones are `null`.
    pub filters: CatalogFilter,
}

/// A single item.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub item: CatalogItem,
}

/// List items, optionally filtered by category/search and sorted.
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Json<ListingResponse> {
    let items = state.catalog().list(&filter);

    Json(ListingResponse {
        success: true,
        count: items.len(),
        items,
        filters: filter,
    })
}

/// Show one item by ID.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ItemResponse>> {
    let item = state
        .catalog()
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}
