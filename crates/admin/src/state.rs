//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{AdminClient, AuthClient, StorageClient};
use crate::config::AdminConfig;
use crate::services::auth::AuthService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; owns the three backend clients and the
/// auth gate.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: AdminClient,
    storage: StorageClient,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let backend = AdminClient::new(&config.backend);
        let storage = StorageClient::new(&config.backend, config.storage_bucket.clone());
        let auth = AuthService::new(
            AuthClient::new(&config.backend),
            backend.clone(),
            config.public_url.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                storage,
                auth,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the table client.
    #[must_use]
    pub fn backend(&self) -> &AdminClient {
        &self.inner.backend
    }

    /// Get a reference to the storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }

    /// Get a reference to the auth/role gate.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
