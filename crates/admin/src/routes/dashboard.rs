//! Dashboard counts handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Entity counts shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_categories: u64,
    pub total_brands: u64,
    pub active_products: u64,
}

/// Dashboard: four exact counts, fetched concurrently.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    let backend = state.backend();

    let (total_products, total_categories, total_brands, active_products) = tokio::try_join!(
        backend.count_products(false),
        backend.count_categories(),
        backend.count_brands(),
        backend.count_products(true),
    )?;

    Ok(Json(DashboardStats {
        total_products,
        total_categories,
        total_brands,
        active_products,
    }))
}
