//! Brand table operations.

use serde::Serialize;
use tracing::instrument;

use maison_core::{Brand, BrandId};

use super::{AdminClient, BackendError};

/// Insert payload for a brand row.
#[derive(Debug, Clone, Serialize)]
pub struct NewBrand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub is_active: bool,
}

/// Update payload for a brand row; only set fields are written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrandPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl AdminClient {
    /// All brands in name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_brands(&self) -> Result<Vec<Brand>, BackendError> {
        self.select(
            "brands",
            &[
                ("select", "*".to_string()),
                ("order", "name.asc".to_string()),
            ],
        )
        .await
    }

    /// Active brands only (preset pickers).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn active_brands(&self) -> Result<Vec<Brand>, BackendError> {
        self.select(
            "brands",
            &[
                ("select", "*".to_string()),
                ("is_active", "eq.true".to_string()),
                ("order", "name.asc".to_string()),
            ],
        )
        .await
    }

    /// Insert a brand and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, brand), fields(name = %brand.name))]
    pub async fn insert_brand(&self, brand: &NewBrand) -> Result<Brand, BackendError> {
        self.insert("brands", brand).await
    }

    /// Apply a patch to a brand and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the brand does not exist.
    #[instrument(skip(self, patch))]
    pub async fn update_brand(&self, id: BrandId, patch: &BrandPatch) -> Result<Brand, BackendError> {
        self.update("brands", id.as_uuid(), patch).await
    }

    /// Delete a brand.
    ///
    /// Referencing products keep their `brand_id`; the reference is weak
    /// and no client-side cascade is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn delete_brand(&self, id: BrandId) -> Result<(), BackendError> {
        self.delete("brands", id.as_uuid()).await
    }

    /// Exact brand count.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn count_brands(&self) -> Result<u64, BackendError> {
        self.count("brands", &[("select", "id".to_string())]).await
    }
}
