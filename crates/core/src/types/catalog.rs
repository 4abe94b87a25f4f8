//! Catalog records as stored in the hosted backend.
//!
//! These mirror the backend's table rows (`products`, `brands`,
//! `categories`, `site_settings`). Insert/patch payloads live with the
//! admin client; these are the shapes both services read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{BrandId, CategoryId, ProductId, SettingId};
use crate::types::price::Price;
use crate::types::status::ProductStatus;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Ordered gallery images; `image_url` is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether this product is an incomplete bulk-upload draft.
    ///
    /// The explicit status column is authoritative; the legacy
    /// inactive-and-free heuristic is kept only for rows written before
    /// the column existed.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.status.is_draft() || (!self.is_active && self.price.is_zero())
    }
}

/// A brand (maison) referenced by products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub is_active: bool,
}

/// A browsing category; one level of nesting via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// A singleton site setting row.
///
/// Rows are pre-seeded (`maison-cli seed settings`); only `value` is ever
/// updated. `category` groups settings into admin UI tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: SettingId,
    pub key: String,
    pub value: String,
    pub category: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn minimal_product_json() -> serde_json::Value {
        serde_json::json!({
            "id": "0b2f4a4e-7a9e-4f3e-9a56-0d4d7c2f3a10",
            "name": "Classic Leather Bag",
            "slug": "classic-leather-bag",
            "price": 2450,
            "is_active": true,
        })
    }

    #[test]
    fn test_product_deserializes_with_defaults() {
        let product: Product = serde_json::from_value(minimal_product_json()).unwrap();
        assert_eq!(product.status, ProductStatus::Published);
        assert!(product.images.is_empty());
        assert!(product.brand_id.is_none());
        assert!(!product.is_draft());
    }

    #[test]
    fn test_draft_detection_explicit_status() {
        let mut json = minimal_product_json();
        json["status"] = "draft".into();
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(product.is_draft());
    }

    #[test]
    fn test_draft_detection_legacy_heuristic() {
        let mut json = minimal_product_json();
        json["price"] = 0.into();
        json["is_active"] = false.into();
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(product.is_draft());
    }

    #[test]
    fn test_free_inactive_published_is_not_misclassified_when_status_present() {
        // With the explicit column a free, deactivated product stays
        // published; only the legacy fallback would flag it.
        let mut json = minimal_product_json();
        json["status"] = "published".into();
        json["price"] = 100.into();
        json["is_active"] = false.into();
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(!product.is_draft());
    }
}
