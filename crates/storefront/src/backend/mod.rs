//! Hosted-backend client for the public catalog.
//!
//! # Architecture
//!
//! - Thin typed wrapper over the backend's table REST interface via
//!   `reqwest`; the backend is the source of truth, no local sync.
//! - Read-only: this binary only holds the publishable anon key. Writes
//!   and the storage/auth surfaces live in the admin binary.
//! - In-memory caching via `moka` for catalog reads (5 minute TTL);
//!   search queries bypass the cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use maison_storefront::backend::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.backend);
//! let categories = catalog.root_categories().await?;
//! let product = catalog.product_by_slug("classic-leather-bag").await?;
//! ```

mod cache;
mod catalog;

pub use catalog::{CatalogClient, ProductQuery};

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

/// Extract a displayable message from a backend error body.
///
/// The table interface reports errors as `{"message": ...}` (sometimes with
/// `code`/`details`); anything unrecognized is passed through verbatim.
#[must_use]
pub fn api_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    if body.is_empty() {
        "(no error details provided)".to_string()
    } else {
        body.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("product classic-bag".to_string());
        assert_eq!(err.to_string(), "Not found: product classic-bag");

        let err = BackendError::Api {
            status: 400,
            message: "invalid input".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (400): invalid input");
    }

    #[test]
    fn test_api_message_parses_json_body() {
        let body = r#"{"code":"22P02","message":"invalid input syntax"}"#;
        assert_eq!(api_message(body), "invalid input syntax");
    }

    #[test]
    fn test_api_message_passthrough() {
        assert_eq!(api_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_api_message_empty_body() {
        assert_eq!(api_message(""), "(no error details provided)");
    }

    #[test]
    fn test_api_message_truncates_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(api_message(&long).len(), 200);
    }
}
