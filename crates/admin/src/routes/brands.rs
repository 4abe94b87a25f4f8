//! Brand CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use maison_core::{Brand, BrandId};

use crate::backend::{BrandPatch, NewBrand};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Create/update form payload.
#[derive(Debug, Deserialize)]
pub struct BrandForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl BrandForm {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        Ok(())
    }
}

/// All brands in name order.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Brand>>> {
    Ok(Json(state.backend().list_brands().await?))
}

/// Create a brand.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<BrandForm>,
) -> Result<(StatusCode, Json<Brand>)> {
    form.validate()?;

    let row = NewBrand {
        name: form.name.clone(),
        description: form.description.clone().filter(|d| !d.is_empty()),
        logo_url: form.logo_url.clone().filter(|u| !u.is_empty()),
        is_active: form.is_active,
    };

    let brand = state.backend().insert_brand(&row).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// Update a brand.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
    Json(form): Json<BrandForm>,
) -> Result<Json<Brand>> {
    form.validate()?;

    let patch = BrandPatch {
        name: Some(form.name.clone()),
        description: Some(form.description.clone().filter(|d| !d.is_empty())),
        logo_url: Some(form.logo_url.clone().filter(|u| !u.is_empty())),
        is_active: Some(form.is_active),
    };

    let brand = state.backend().update_brand(id, &patch).await?;
    Ok(Json(brand))
}

/// Delete a brand.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
) -> Result<StatusCode> {
    state.backend().delete_brand(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
