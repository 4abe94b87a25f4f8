//! Home page payload: site identity, category gateway, bestseller strip.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::routes::categories::{CategoriesPayload, gateway_payload};
use crate::routes::products::ProductsPayload;
use crate::state::AppState;

/// Site identity block, sourced from settings with blank defaults.
#[derive(Debug, Serialize)]
pub struct SiteView {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

/// Home payload.
#[derive(Debug, Serialize)]
pub struct HomePayload {
    pub site: SiteView,
    pub categories: CategoriesPayload,
    pub bestsellers: ProductsPayload,
}

/// Home: everything the landing page needs in one round trip.
pub async fn home(State(state): State<AppState>) -> Json<HomePayload> {
    let (settings, categories, bestsellers) = tokio::join!(
        state.catalog().settings(),
        gateway_payload(&state),
        super::products::bestsellers(State(state.clone())),
    );

    let settings = settings.map(|s| s.as_ref().clone()).unwrap_or_default();
    let get = |key: &str| settings.get(key).cloned().filter(|v| !v.is_empty());

    Json(HomePayload {
        site: SiteView {
            name: get("site_name").unwrap_or_else(|| "Maison".to_string()),
            description: get("site_description").unwrap_or_default(),
            instagram_url: get("instagram_url"),
            whatsapp_number: get("whatsapp_number"),
        },
        categories,
        bestsellers: bestsellers.0,
    })
}
