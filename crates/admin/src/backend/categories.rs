//! Category table operations.

use serde::Serialize;
use tracing::instrument;

use maison_core::{Category, CategoryId};

use super::{AdminClient, BackendError};

/// Insert payload for a category row.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Update payload for a category row; only set fields are written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<CategoryId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl AdminClient {
    /// All categories in sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.select(
            "categories",
            &[
                ("select", "*".to_string()),
                ("order", "sort_order.asc".to_string()),
            ],
        )
        .await
    }

    /// Active categories only (preset pickers).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn active_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.select(
            "categories",
            &[
                ("select", "*".to_string()),
                ("is_active", "eq.true".to_string()),
                ("order", "sort_order.asc".to_string()),
            ],
        )
        .await
    }

    /// Insert a category and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, category), fields(slug = %category.slug))]
    pub async fn insert_category(&self, category: &NewCategory) -> Result<Category, BackendError> {
        self.insert("categories", category).await
    }

    /// Apply a patch to a category and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the category does not exist.
    #[instrument(skip(self, patch))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, BackendError> {
        self.update("categories", id.as_uuid(), patch).await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), BackendError> {
        self.delete("categories", id.as_uuid()).await
    }

    /// Exact category count.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn count_categories(&self) -> Result<u64, BackendError> {
        self.count("categories", &[("select", "id".to_string())])
            .await
    }
}
