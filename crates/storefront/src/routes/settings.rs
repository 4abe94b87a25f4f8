//! Public site settings handler.

use std::collections::HashMap;

use axum::{Json, extract::State};

use crate::error::Result;
use crate::state::AppState;

/// Public site settings as a key→value map.
pub async fn index(State(state): State<AppState>) -> Result<Json<HashMap<String, String>>> {
    let settings = state.catalog().settings().await?;
    Ok(Json(settings.as_ref().clone()))
}
