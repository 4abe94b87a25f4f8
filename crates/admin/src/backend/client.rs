//! Core table-interface client (service-role key).

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{BackendError, api_message};
use crate::config::BackendConfig;

/// Client for the hosted backend's table REST interface.
///
/// Holds the service-role key; every admin-side read and write goes
/// through here. Typed per-table operations are implemented in sibling
/// modules as `impl AdminClient` blocks.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl AdminClient {
    /// Create a new admin table client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                service_key: config.service_key.expose_secret().to_string(),
            }),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
    }

    async fn read_success(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(BackendError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            })
        }
    }

    /// Select rows from a table.
    ///
    /// `query` carries the backend's filter/order/limit operators, e.g.
    /// `("is_active", "eq.true")` or `("order", "created_at.desc")`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let response = self
            .authed(self.inner.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Insert a row and return the stored representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend does not
    /// return the inserted row.
    pub(crate) async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: &impl Serialize,
    ) -> Result<T, BackendError> {
        let response = self
            .authed(self.inner.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        let mut rows: Vec<T> = serde_json::from_str(&body)?;
        rows.pop()
            .ok_or_else(|| BackendError::NotFound(format!("{table}: inserted row not returned")))
    }

    /// Update rows matching `id` and return the stored representation.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no row matched.
    pub(crate) async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        id: uuid::Uuid,
        patch: &impl Serialize,
    ) -> Result<T, BackendError> {
        let response = self
            .authed(self.inner.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        let mut rows: Vec<T> = serde_json::from_str(&body)?;
        rows.pop()
            .ok_or_else(|| BackendError::NotFound(format!("{table}: {id}")))
    }

    /// Delete rows matching `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub(crate) async fn delete(&self, table: &str, id: uuid::Uuid) -> Result<(), BackendError> {
        let response = self
            .authed(self.inner.client.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        Self::read_success(response).await.map(|_| ())
    }

    /// Start an authenticated PATCH against a table with arbitrary filters.
    pub(crate) fn authed_patch(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> reqwest::RequestBuilder {
        self.authed(self.inner.client.patch(self.table_url(table)))
            .query(query)
    }

    /// Exact row count for a table, head-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the count header is
    /// missing or malformed.
    pub(crate) async fn count(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<u64, BackendError> {
        let response = self
            .authed(self.inner.client.head(self.table_url(table)))
            .query(query)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        // Content-Range: 0-24/3573 (total after the slash)
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|range| range.rsplit('/').next())
            .and_then(|total| total.parse::<u64>().ok());

        total.ok_or_else(|| BackendError::Api {
            status: status.as_u16(),
            message: format!("{table}: missing count in Content-Range"),
        })
    }
}
