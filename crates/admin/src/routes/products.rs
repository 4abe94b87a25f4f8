//! Product CRUD handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use maison_core::{
    Brand, BrandId, Category, CategoryId, Price, Product, ProductId, ProductStatus, slugify,
};

use crate::backend::{NewProduct, ProductPatch};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// List filters; search and the drafts toggle are applied in-handler over
/// the fetched list, mirroring the admin table's client-side filtering.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub drafts: Option<bool>,
}

/// Product listing payload.
#[derive(Debug, Serialize)]
pub struct ProductsPayload {
    pub products: Vec<Product>,
    /// Incomplete bulk-upload drafts across the whole table.
    pub draft_count: usize,
}

/// Create/update form payload.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Option<Price>,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

const fn default_true() -> bool {
    true
}

impl ProductForm {
    /// Name and price are required before any network call.
    fn validate(&self) -> Result<Price> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name and price are required".into()));
        }
        self.price
            .ok_or_else(|| AppError::Validation("Name and price are required".into()))
    }

    fn slug(&self) -> String {
        self.slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .map_or_else(|| slugify(&self.name), ToString::to_string)
    }
}

/// List products, newest first, with search and drafts filter.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductsPayload>> {
    let all = state.backend().list_products().await?;

    let draft_count = all.iter().filter(|p| p.is_draft()).count();

    let needle = query.q.unwrap_or_default().to_lowercase();
    let drafts_only = query.drafts.unwrap_or(false);

    let products = all
        .into_iter()
        .filter(|p| {
            let matches_search = needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.slug.to_lowercase().contains(&needle);
            let matches_drafts = !drafts_only || p.is_draft();
            matches_search && matches_drafts
        })
        .collect();

    Ok(Json(ProductsPayload {
        products,
        draft_count,
    }))
}

/// Create a product from the admin form.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<Product>)> {
    let price = form.validate()?;

    let row = NewProduct {
        name: form.name.clone(),
        slug: form.slug(),
        description: form.description.clone().filter(|d| !d.is_empty()),
        price,
        original_price: form.original_price,
        image_url: form.image_url.clone().filter(|u| !u.is_empty()),
        status: form.status.unwrap_or(ProductStatus::Published),
        is_active: form.is_active,
        is_featured: form.is_featured,
        is_bestseller: form.is_bestseller,
        stock_quantity: form.stock_quantity.unwrap_or(0),
        brand_id: form.brand_id,
        category_id: form.category_id,
    };

    let product = state.backend().insert_product(&row).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product from the admin form.
///
/// The edit form is the "add details" step for bulk-upload drafts, so a
/// save without an explicit status publishes the product.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Product>> {
    let price = form.validate()?;

    let patch = ProductPatch {
        name: Some(form.name.clone()),
        slug: Some(form.slug()),
        description: Some(form.description.clone().filter(|d| !d.is_empty())),
        price: Some(price),
        original_price: Some(form.original_price),
        image_url: Some(form.image_url.clone().filter(|u| !u.is_empty())),
        status: Some(form.status.unwrap_or(ProductStatus::Published)),
        is_active: Some(form.is_active),
        is_featured: Some(form.is_featured),
        is_bestseller: Some(form.is_bestseller),
        stock_quantity: Some(form.stock_quantity.unwrap_or(0)),
        brand_id: Some(form.brand_id),
        category_id: Some(form.category_id),
    };

    let product = state.backend().update_product(id, &patch).await?;
    Ok(Json(product))
}

/// Delete a product.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.backend().delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Picker data for the product form and the bulk-upload preset step.
#[derive(Debug, Serialize)]
pub struct PresetsPayload {
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
}

/// Active brands and categories for pickers.
pub async fn presets(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<PresetsPayload>> {
    let (brands, categories) = tokio::try_join!(
        state.backend().active_brands(),
        state.backend().active_categories(),
    )?;

    Ok(Json(PresetsPayload { brands, categories }))
}
