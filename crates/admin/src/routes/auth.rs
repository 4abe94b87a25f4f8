//! Auth route handlers.

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::backend::Session;
use crate::error::Result;
use crate::state::AppState;

/// Sign-in payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign-up payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Sign in with email and password.
///
/// Invalid pairs come back as 401 with a dedicated message; everything
/// else is a generic auth failure.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Session>> {
    let session = state.auth().sign_in(&request.email, &request.password).await?;
    Ok(Json(session))
}

/// Create an account.
///
/// Triggers the welcome redirect configured from the public origin;
/// duplicate emails come back as 409.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = state
        .auth()
        .sign_up(&request.email, &request.password, &request.full_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user, "message": "Account created" })),
    ))
}

/// Revoke the caller's session. Always succeeds from the client's view.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        state.auth().sign_out(token).await;
    }

    StatusCode::NO_CONTENT
}
