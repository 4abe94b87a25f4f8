//! Hosted-backend clients for the back-office.
//!
//! # Architecture
//!
//! Three thin typed clients over `reqwest`, one per backend surface:
//!
//! - [`AdminClient`] - table REST interface with the service-role key:
//!   full CRUD over `products`, `brands`, `categories`, `site_settings`,
//!   and role lookups in `user_roles`.
//! - [`StorageClient`] - object storage: byte upload and public-URL
//!   resolution for the product-images bucket.
//! - [`AuthClient`] - auth surface: password grant, sign-up, logout,
//!   current-user lookup, and (service key) user administration.
//!
//! The backend is the source of truth; nothing is persisted locally and
//! nothing is retried.

mod auth;
mod brands;
mod categories;
mod client;
mod products;
mod roles;
mod settings;
mod storage;

pub use auth::{AuthClient, AuthUser, Session};
pub use brands::{BrandPatch, NewBrand};
pub use categories::{CategoryPatch, NewCategory};
pub use client::AdminClient;
pub use products::{NewProduct, ProductPatch};
pub use settings::NewSetting;
pub use storage::StorageClient;

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Backend-provided message, stringified for display.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl BackendError {
    /// Whether the backend rejected the caller's credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

/// Extract a displayable message from a backend error body.
///
/// The table interface reports `{"message": ...}`; the auth surface uses
/// `{"msg": ...}` or `{"error_description": ...}`. Anything unrecognized
/// is passed through verbatim (truncated).
#[must_use]
pub fn api_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }

    if body.is_empty() {
        "(no error details provided)".to_string()
    } else {
        body.chars().take(200).collect()
    }
}
