//! Category CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use maison_core::{Category, CategoryId, slugify};

use crate::backend::{CategoryPatch, NewCategory};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Create/update form payload.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

const fn default_true() -> bool {
    true
}

impl CategoryForm {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        Ok(())
    }

    fn slug(&self) -> String {
        self.slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .map_or_else(|| slugify(&self.name), ToString::to_string)
    }
}

/// All categories in sort order.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.backend().list_categories().await?))
}

/// Create a category.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<Category>)> {
    form.validate()?;

    let row = NewCategory {
        name: form.name.clone(),
        slug: form.slug(),
        description: form.description.clone().filter(|d| !d.is_empty()),
        image_url: form.image_url.clone().filter(|u| !u.is_empty()),
        parent_id: form.parent_id,
        is_active: form.is_active,
        sort_order: form.sort_order.unwrap_or(0),
    };

    let category = state.backend().insert_category(&row).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(form): Json<CategoryForm>,
) -> Result<Json<Category>> {
    form.validate()?;

    let patch = CategoryPatch {
        name: Some(form.name.clone()),
        slug: Some(form.slug()),
        description: Some(form.description.clone().filter(|d| !d.is_empty())),
        image_url: Some(form.image_url.clone().filter(|u| !u.is_empty())),
        parent_id: Some(form.parent_id),
        is_active: Some(form.is_active),
        sort_order: Some(form.sort_order.unwrap_or(0)),
    };

    let category = state.backend().update_category(id, &patch).await?;
    Ok(Json(category))
}

/// Delete a category.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    state.backend().delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
