//! Product table operations.

use serde::Serialize;
use tracing::instrument;

use maison_core::{BrandId, CategoryId, Price, Product, ProductId, ProductStatus};

use super::{AdminClient, BackendError};

/// Insert payload for a product row.
///
/// Absent optional fields are omitted from the JSON so the backend's
/// column defaults apply.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: ProductStatus,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_bestseller: bool,
    pub stock_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<BrandId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Update payload for a product row; only set fields are written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Option<Price>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bestseller: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<Option<BrandId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<CategoryId>>,
}

impl AdminClient {
    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        self.select(
            "products",
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    /// Insert a product and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, product), fields(slug = %product.slug))]
    pub async fn insert_product(&self, product: &NewProduct) -> Result<Product, BackendError> {
        self.insert("products", product).await
    }

    /// Apply a patch to a product and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, BackendError> {
        self.update("products", id.as_uuid(), patch).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        self.delete("products", id.as_uuid()).await
    }

    /// Exact product count, optionally restricted to active rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn count_products(&self, active_only: bool) -> Result<u64, BackendError> {
        let mut query = vec![("select", "id".to_string())];
        if active_only {
            query.push(("is_active", "eq.true".to_string()));
        }
        self.count("products", &query).await
    }
}
