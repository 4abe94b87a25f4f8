//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! POST /auth/login               - Sign in (returns token pair)
//! POST /auth/register            - Create an account
//! POST /auth/logout              - Revoke the caller's session
//!
//! # Everything below requires an admin session (bearer token)
//! GET  /admin/dashboard          - Entity counts
//!
//! GET  /admin/products           - List (?q=&drafts=true) + draft count
//! POST /admin/products           - Create
//! PUT  /admin/products/{id}      - Update (publishes drafts)
//! DELETE /admin/products/{id}    - Delete
//! GET  /admin/products/presets   - Active brands/categories for pickers
//! POST /admin/products/bulk      - Bulk upload wizard run (multipart)
//!
//! GET/POST /admin/brands, PUT/DELETE /admin/brands/{id}
//! GET/POST /admin/categories, PUT/DELETE /admin/categories/{id}
//!
//! GET  /admin/settings           - All settings grouped by category
//! PUT  /admin/settings           - Bulk value save
//!
//! POST /admin/uploads/image      - Single image upload (multipart)
//! ```

pub mod auth;
pub mod brands;
pub mod categories;
pub mod dashboard;
pub mod products;
pub mod settings;
pub mod uploads;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the admin-gated routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::index))
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::remove),
        )
        .route("/products/presets", get(products::presets))
        .route("/products/bulk", post(uploads::bulk))
        .route("/brands", get(brands::index).post(brands::create))
        .route("/brands/{id}", put(brands::update).delete(brands::remove))
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/settings", get(settings::index).put(settings::save))
        .route("/uploads/image", post(uploads::image))
}

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
}
