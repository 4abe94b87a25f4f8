//! Authentication extractor for admin routes.
//!
//! Every `/admin/*` handler takes [`RequireAdmin`]; the extractor resolves
//! the bearer token through the gate and rejects anything that is not an
//! admin session. Rejections carry a `redirect` hint so the frontend can
//! send unauthenticated users to the login screen (with a return path)
//! and authenticated non-admins back to the public home.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::backend::AuthUser;
use crate::services::auth::Gate;
use crate::state::AppState;

/// Extractor that requires an admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {:?}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

/// Error returned when admin authorization fails.
pub enum AdminAuthRejection {
    /// No usable session; client should go to login with a return path.
    Unauthenticated,
    /// Valid session without the admin role; client should go home.
    Forbidden,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "authentication required",
                    "redirect": "/auth?redirect=/admin",
                })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "admin access required",
                    "redirect": "/",
                })),
            )
                .into_response(),
        }
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AdminAuthRejection::Unauthenticated)?;

        match state.auth().authorize(token).await {
            Gate::Admin(user) => Ok(Self(user)),
            Gate::Denied(_) => Err(AdminAuthRejection::Forbidden),
            Gate::Unauthenticated => Err(AdminAuthRejection::Unauthenticated),
        }
    }
}
