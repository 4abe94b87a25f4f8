//! Product grid, detail, and bestseller route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use maison_core::{Brand, BrandId, CategoryId, Price, Product, ProductId};

use crate::backend::{BackendError, ProductQuery};
use crate::content;
use crate::error::{AppError, Result};
use crate::order::{OrderLinks, order_links};
use crate::state::AppState;

/// Product grid filters.
#[derive(Debug, Deserialize)]
pub struct GridQuery {
    /// Category id filter.
    pub category: Option<String>,
    /// Brand id filter.
    pub brand: Option<String>,
    /// Name/slug substring search.
    pub q: Option<String>,
}

/// Product card for the grid and bestseller strip.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub slug: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub is_featured: bool,
    pub is_bestseller: bool,
}

impl ProductCard {
    fn from_product(product: &Product, brand: Option<String>) -> Self {
        Self {
            id: Some(product.id),
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: product.price,
            original_price: product.original_price,
            image_url: product.image_url.clone(),
            brand,
            is_featured: product.is_featured,
            is_bestseller: product.is_bestseller,
        }
    }
}

impl From<content::FallbackBestseller> for ProductCard {
    fn from(item: content::FallbackBestseller) -> Self {
        Self {
            id: None,
            name: item.name.clone(),
            slug: maison_core::slugify(&item.name),
            price: Price::from_major(i64::from(item.price)),
            original_price: None,
            image_url: Some(item.image),
            brand: Some(item.brand),
            is_featured: false,
            is_bestseller: true,
        }
    }
}

/// Product detail payload with order links.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub in_stock: bool,
    pub order: OrderLinks,
}

/// Grid listing payload.
#[derive(Debug, Serialize)]
pub struct ProductsPayload {
    pub source: &'static str,
    pub products: Vec<ProductCard>,
}

fn parse_id<T: std::str::FromStr>(value: Option<String>, field: &str) -> Result<Option<T>> {
    match value {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid {field} id"))),
    }
}

fn brand_names(brands: &[Brand]) -> impl Fn(Option<BrandId>) -> Option<String> + '_ {
    move |id| {
        id.and_then(|id| {
            brands
                .iter()
                .find(|brand| brand.id == id)
                .map(|brand| brand.name.clone())
        })
    }
}

/// Product grid: active products, newest first, filtered.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Result<Json<ProductsPayload>> {
    let filter = ProductQuery {
        category_id: parse_id::<CategoryId>(query.category, "category")?,
        brand_id: parse_id::<BrandId>(query.brand, "brand")?,
        search: query.q.filter(|q| !q.is_empty()),
    };

    let products = state.catalog().products(&filter).await?;

    // Brand names are resolved from the (cached) brand list rather than a
    // per-product lookup.
    let brands = state
        .catalog()
        .active_brands()
        .await
        .map(|brands| brands.to_vec())
        .unwrap_or_default();
    let resolve = brand_names(&brands);

    Ok(Json(ProductsPayload {
        source: "live",
        products: products
            .iter()
            .map(|p| ProductCard::from_product(p, resolve(p.brand_id)))
            .collect(),
    }))
}

/// Product detail with order links.
///
/// Serves a curated placeholder when the product cannot be resolved, so
/// the showcase never renders blank.
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Json<ProductDetail> {
    let settings = state
        .catalog()
        .settings()
        .await
        .map(|s| s.as_ref().clone())
        .unwrap_or_default();

    match state.catalog().product_by_slug(&slug).await {
        Ok(product) => {
            let brand = match product.brand_id {
                Some(id) => state.catalog().brand_name(id).await.ok().flatten(),
                None => None,
            };

            let order = order_links(&settings, &product, &state.config().base_url);

            Json(ProductDetail {
                source: "live",
                id: Some(product.id),
                name: product.name.clone(),
                slug: product.slug.clone(),
                description: product.description.clone(),
                price: product.price,
                original_price: product.original_price,
                image_url: product.image_url.clone(),
                images: product.images.clone(),
                brand,
                in_stock: product.stock_quantity > 0,
                order,
            })
        }
        Err(e) => {
            if !matches!(e, BackendError::NotFound(_)) {
                tracing::warn!(error = %e, "Falling back to placeholder product");
            }

            let placeholder = content::placeholder_product();
            let instagram = settings
                .get("instagram_url")
                .filter(|url| !url.is_empty())
                .cloned();

            Json(ProductDetail {
                source: "fallback",
                id: None,
                name: placeholder.name.clone(),
                slug,
                description: None,
                price: Price::from_major(i64::from(placeholder.price)),
                original_price: None,
                image_url: Some(placeholder.image),
                images: vec![],
                brand: Some(placeholder.brand),
                in_stock: true,
                order: OrderLinks {
                    whatsapp: None,
                    instagram,
                },
            })
        }
    }
}

/// Bestseller strip: at most 10 active bestsellers.
pub async fn bestsellers(State(state): State<AppState>) -> Json<ProductsPayload> {
    let payload = match state.catalog().bestsellers().await {
        Ok(products) if !products.is_empty() => {
            let brands = state
                .catalog()
                .active_brands()
                .await
                .map(|brands| brands.to_vec())
                .unwrap_or_default();
            let resolve = brand_names(&brands);

            ProductsPayload {
                source: "live",
                products: products
                    .iter()
                    .map(|p| ProductCard::from_product(p, resolve(p.brand_id)))
                    .collect(),
            }
        }
        Ok(_) => ProductsPayload {
            source: "fallback",
            products: content::bestsellers().into_iter().map(Into::into).collect(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to curated bestsellers");
            ProductsPayload {
                source: "fallback",
                products: content::bestsellers().into_iter().map(Into::into).collect(),
            }
        }
    };

    Json(payload)
}
