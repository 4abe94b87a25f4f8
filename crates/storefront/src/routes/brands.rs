//! Brand selection route handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use maison_core::{Brand, BrandId};

use crate::content;
use crate::state::AppState;

/// Brand display data.
#[derive(Debug, Clone, Serialize)]
pub struct BrandView {
    /// Absent for curated fallback entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BrandId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl From<&Brand> for BrandView {
    fn from(brand: &Brand) -> Self {
        Self {
            id: Some(brand.id),
            name: brand.name.clone(),
            description: brand.description.clone(),
            logo_url: brand.logo_url.clone(),
        }
    }
}

impl From<content::FallbackBrand> for BrandView {
    fn from(brand: content::FallbackBrand) -> Self {
        Self {
            id: None,
            name: brand.name,
            description: None,
            logo_url: Some(brand.logo),
        }
    }
}

/// Brand listing payload.
#[derive(Debug, Serialize)]
pub struct BrandsPayload {
    pub source: &'static str,
    pub brands: Vec<BrandView>,
}

/// Brand selection grid: active brands, name order.
pub async fn index(State(state): State<AppState>) -> Json<BrandsPayload> {
    let payload = match state.catalog().active_brands().await {
        Ok(brands) if !brands.is_empty() => BrandsPayload {
            source: "live",
            brands: brands.iter().map(BrandView::from).collect(),
        },
        Ok(_) => BrandsPayload {
            source: "fallback",
            brands: content::brands().into_iter().map(Into::into).collect(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to curated brands");
            BrandsPayload {
                source: "fallback",
                brands: content::brands().into_iter().map(Into::into).collect(),
            }
        }
    };

    Json(payload)
}
