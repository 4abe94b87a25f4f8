//! Site-settings handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use maison_core::Setting;

use crate::error::Result;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// One key/value pair from the settings form.
#[derive(Debug, Deserialize)]
pub struct SettingValue {
    pub key: String,
    pub value: String,
}

/// All settings grouped by category.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Setting>>> {
    Ok(Json(state.backend().list_settings().await?))
}

/// Bulk save: rewrite each submitted value by key, sequentially.
pub async fn save(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(values): Json<Vec<SettingValue>>,
) -> Result<StatusCode> {
    for setting in &values {
        state
            .backend()
            .update_setting_value(&setting.key, &setting.value)
            .await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
