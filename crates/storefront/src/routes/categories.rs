//! Category gateway and subcategory route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use maison_core::{Category, CategoryId};

use crate::content;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Category display data.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    /// Absent for curated fallback entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            image_url: category.image_url.clone(),
        }
    }
}

impl From<content::FallbackCategory> for CategoryView {
    fn from(category: content::FallbackCategory) -> Self {
        Self {
            id: None,
            name: category.name,
            slug: category.slug,
            description: None,
            image_url: Some(category.image),
        }
    }
}

/// Category listing payload.
#[derive(Debug, Serialize)]
pub struct CategoriesPayload {
    pub source: &'static str,
    pub categories: Vec<CategoryView>,
}

/// Build the gateway payload, falling back to curated content when the
/// backend errors or the table is empty.
pub(crate) async fn gateway_payload(state: &AppState) -> CategoriesPayload {
    match state.catalog().root_categories().await {
        Ok(categories) if !categories.is_empty() => CategoriesPayload {
            source: "live",
            categories: categories.iter().map(CategoryView::from).collect(),
        },
        Ok(_) => CategoriesPayload {
            source: "fallback",
            categories: content::categories().into_iter().map(Into::into).collect(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to curated categories");
            CategoriesPayload {
                source: "fallback",
                categories: content::categories().into_iter().map(Into::into).collect(),
            }
        }
    }
}

/// Category gateway: active root categories in sort order.
pub async fn index(State(state): State<AppState>) -> Json<CategoriesPayload> {
    Json(gateway_payload(&state).await)
}

/// Subcategory grid for a gateway category.
pub async fn children(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoriesPayload>> {
    let parent = state
        .catalog()
        .category_by_slug(&slug)
        .await
        .map_err(|e| match e {
            crate::backend::BackendError::NotFound(_) => {
                AppError::NotFound(format!("category: {slug}"))
            }
            other => AppError::Backend(other),
        })?;

    let children = state.catalog().child_categories(parent.id).await?;

    Ok(Json(CategoriesPayload {
        source: "live",
        categories: children.iter().map(CategoryView::from).collect(),
    }))
}
