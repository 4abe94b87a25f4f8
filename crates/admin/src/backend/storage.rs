//! Object-storage client for the product-images bucket.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::instrument;

use crate::backend::{BackendError, api_message};
use crate::config::BackendConfig;

/// Client for the hosted backend's object storage.
///
/// Two operations only: raw byte upload and public-URL resolution. There
/// is no delete path from the pipeline - an upload whose product insert
/// fails stays behind as an orphaned object.
#[derive(Clone)]
pub struct StorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl StorageClient {
    /// Create a new storage client for a bucket.
    #[must_use]
    pub fn new(config: &BackendConfig, bucket: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StorageClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                service_key: config.service_key.expose_secret().to_string(),
                bucket: bucket.into(),
            }),
        }
    }

    /// Upload raw bytes under a storage key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// object (e.g. key already exists).
    #[instrument(skip(self, bytes), fields(path = %path, size = bytes.len()))]
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let url = format!(
            "{}/storage/v1/object/{}/{path}",
            self.inner.base_url, self.inner.bucket
        );

        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            })
        }
    }

    /// Resolve the public URL for a stored object.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.inner.base_url, self.inner.bucket
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_shape() {
        let config = BackendConfig::new("https://backend.example.com", "key");
        let storage = StorageClient::new(&config, "product-images");
        assert_eq!(
            storage.public_url("products/1700000000000-0.jpg"),
            "https://backend.example.com/storage/v1/object/public/product-images/products/1700000000000-0.jpg"
        );
    }
}
