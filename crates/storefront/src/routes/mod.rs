//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (backend reachable)
//!
//! GET  /                          - Home payload (site, gateway, bestsellers)
//! GET  /categories                - Category gateway
//! GET  /categories/{slug}/children - Subcategory grid
//! GET  /brands                    - Brand selection
//! GET  /products                  - Product grid (?category=&brand=&q=)
//! GET  /products/{slug}           - Product detail with order links
//! GET  /bestsellers               - Bestseller strip
//! GET  /settings                  - Public site settings
//! ```
//!
//! Every browsing step serves curated fallback content when the backend
//! errors or a table is empty; responses carry a `source` marker so the
//! frontend can tell live data from fallback.

pub mod brands;
pub mod categories;
pub mod home;
pub mod products;
pub mod settings;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/categories", get(categories::index))
        .route("/categories/{slug}/children", get(categories::children))
        .route("/brands", get(brands::index))
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/bestsellers", get(products::bestsellers))
        .route("/settings", get(settings::index))
}
