//! Read-only catalog client over the backend's table REST interface.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use maison_core::{Brand, BrandId, Category, CategoryId, Product, Setting};

use crate::backend::cache::CacheValue;
use crate::backend::{BackendError, api_message};
use crate::config::BackendConfig;

/// Filters for the product grid.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Restrict to a category.
    pub category_id: Option<CategoryId>,
    /// Restrict to a brand.
    pub brand_id: Option<BrandId>,
    /// Name/slug substring search; bypasses the cache.
    pub search: Option<String>,
}

/// Client for the hosted backend's catalog tables.
///
/// Provides typed access to categories, brands, products, and public
/// settings. Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                anon_key: config.anon_key.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a table read and deserialize the row set.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let url = format!("{}/rest/v1/{table}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                table,
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                table,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Active root categories, gateway order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn root_categories(&self) -> Result<Arc<Vec<Category>>, BackendError> {
        let cache_key = "categories:root".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for root categories");
            return Ok(categories);
        }

        let rows = self
            .fetch_rows::<Category>(
                "categories",
                &[
                    ("select", "*".to_string()),
                    ("parent_id", "is.null".to_string()),
                    ("is_active", "eq.true".to_string()),
                    ("order", "sort_order.asc".to_string()),
                ],
            )
            .await?;

        let categories = Arc::new(rows);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Active children of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn child_categories(
        &self,
        parent: CategoryId,
    ) -> Result<Arc<Vec<Category>>, BackendError> {
        let cache_key = format!("categories:children:{parent}");

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for child categories");
            return Ok(categories);
        }

        let rows = self
            .fetch_rows::<Category>(
                "categories",
                &[
                    ("select", "*".to_string()),
                    ("parent_id", format!("eq.{parent}")),
                    ("is_active", "eq.true".to_string()),
                    ("order", "sort_order.asc".to_string()),
                ],
            )
            .await?;

        let categories = Arc::new(rows);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Look up a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such category exists, or an
    /// error if the backend request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Category, BackendError> {
        let rows = self
            .fetch_rows::<Category>(
                "categories",
                &[
                    ("select", "*".to_string()),
                    ("slug", format!("eq.{slug}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("category: {slug}")))
    }

    // =========================================================================
    // Brands
    // =========================================================================

    /// Active brands for the brand-selection step.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn active_brands(&self) -> Result<Arc<Vec<Brand>>, BackendError> {
        let cache_key = "brands:active".to_string();

        if let Some(CacheValue::Brands(brands)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }

        let rows = self
            .fetch_rows::<Brand>(
                "brands",
                &[
                    ("select", "*".to_string()),
                    ("is_active", "eq.true".to_string()),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?;

        let brands = Arc::new(rows);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Brands(brands.clone()))
            .await;

        Ok(brands)
    }

    /// Resolve a brand's display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn brand_name(&self, id: BrandId) -> Result<Option<String>, BackendError> {
        #[derive(Deserialize)]
        struct BrandName {
            name: String,
        }

        let rows = self
            .fetch_rows::<BrandName>(
                "brands",
                &[
                    ("select", "name".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().map(|r| r.name))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Active products, newest first, with optional category/brand/search
    /// filters. Searches are never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Arc<Vec<Product>>, BackendError> {
        let cache_key = format!(
            "products:{}:{}",
            query.category_id.map_or_else(String::new, |c| c.to_string()),
            query.brand_id.map_or_else(String::new, |b| b.to_string()),
        );

        if query.search.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut params = vec![
            ("select", "*".to_string()),
            ("is_active", "eq.true".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(category_id) = query.category_id {
            params.push(("category_id", format!("eq.{category_id}")));
        }
        if let Some(brand_id) = query.brand_id {
            params.push(("brand_id", format!("eq.{brand_id}")));
        }
        if let Some(search) = query.search.as_deref() {
            params.push(("or", format!("(name.ilike.*{search}*,slug.ilike.*{search}*)")));
        }

        let rows = self.fetch_rows::<Product>("products", &params).await?;
        let products = Arc::new(rows);

        if query.search.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Look up a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such product exists, or an
    /// error if the backend request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Arc<Product>, BackendError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let rows = self
            .fetch_rows::<Product>(
                "products",
                &[
                    ("select", "*".to_string()),
                    ("slug", format!("eq.{slug}")),
                    ("is_active", "eq.true".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let product = rows
            .into_iter()
            .next()
            .map(Arc::new)
            .ok_or_else(|| BackendError::NotFound(format!("product: {slug}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(product.clone()))
            .await;

        Ok(product)
    }

    /// Active bestsellers for the home strip (at most 10).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn bestsellers(&self) -> Result<Arc<Vec<Product>>, BackendError> {
        let cache_key = "products:bestsellers".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for bestsellers");
            return Ok(products);
        }

        let rows = self
            .fetch_rows::<Product>(
                "products",
                &[
                    ("select", "*".to_string()),
                    ("is_bestseller", "eq.true".to_string()),
                    ("is_active", "eq.true".to_string()),
                    ("order", "created_at.desc".to_string()),
                    ("limit", "10".to_string()),
                ],
            )
            .await?;

        let products = Arc::new(rows);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Public site settings as a key→value map.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<Arc<HashMap<String, String>>, BackendError> {
        let cache_key = "settings".to_string();

        if let Some(CacheValue::Settings(settings)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for settings");
            return Ok(settings);
        }

        let rows = self
            .fetch_rows::<Setting>(
                "site_settings",
                &[("select", "*".to_string()), ("order", "category".to_string())],
            )
            .await?;

        let settings = Arc::new(
            rows.into_iter()
                .map(|s| (s.key, s.value))
                .collect::<HashMap<_, _>>(),
        );
        self.inner
            .cache
            .insert(cache_key, CacheValue::Settings(settings.clone()))
            .await;

        Ok(settings)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
