//! Role-association lookups.

use serde::Deserialize;
use tracing::instrument;

use maison_core::UserId;

use super::{AdminClient, BackendError};

/// The role value that grants back-office access.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Deserialize)]
struct RoleRow {
    #[allow(dead_code)]
    role: String,
}

impl AdminClient {
    /// Whether the user holds the admin role.
    ///
    /// True only when exactly one `{user_id, role="admin"}` row exists.
    /// Callers treat any error as "not admin" - the gate fails closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn has_admin_role(&self, user_id: UserId) -> Result<bool, BackendError> {
        let rows = self
            .select::<RoleRow>(
                "user_roles",
                &[
                    ("select", "role".to_string()),
                    ("user_id", format!("eq.{user_id}")),
                    ("role", format!("eq.{ADMIN_ROLE}")),
                    ("limit", "2".to_string()),
                ],
            )
            .await?;

        Ok(rows.len() == 1)
    }

    /// Grant the admin role to a user if they do not already hold it.
    ///
    /// Returns `true` when a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn ensure_admin_role(&self, user_id: UserId) -> Result<bool, BackendError> {
        if self.has_admin_role(user_id).await? {
            return Ok(false);
        }

        let row = serde_json::json!({ "user_id": user_id, "role": ADMIN_ROLE });
        self.insert::<serde_json::Value>("user_roles", &row).await?;
        Ok(true)
    }
}
