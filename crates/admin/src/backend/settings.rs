//! Site-settings table operations.
//!
//! Settings rows are singletons pre-seeded by `maison-cli seed settings`;
//! the admin surface only ever rewrites `value`.

use serde::Serialize;
use tracing::instrument;

use maison_core::Setting;

use super::{AdminClient, BackendError};

#[derive(Serialize)]
struct ValuePatch<'a> {
    value: &'a str,
}

impl AdminClient {
    /// All settings grouped by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_settings(&self) -> Result<Vec<Setting>, BackendError> {
        self.select(
            "site_settings",
            &[
                ("select", "*".to_string()),
                ("order", "category".to_string()),
            ],
        )
        .await
    }

    /// Fetch a single setting row by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn setting_by_key(&self, key: &str) -> Result<Option<Setting>, BackendError> {
        let rows = self
            .select::<Setting>(
                "site_settings",
                &[
                    ("select", "*".to_string()),
                    ("key", format!("eq.{key}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Rewrite one setting's value by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, value))]
    pub async fn update_setting_value(&self, key: &str, value: &str) -> Result<(), BackendError> {
        // Keyed update rather than the uuid-keyed helper: settings are
        // addressed by their unique key everywhere in the admin UI.
        let response = self
            .authed_patch("site_settings", &[("key", format!("eq.{key}"))])
            .json(&ValuePatch { value })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Api {
                status: status.as_u16(),
                message: super::api_message(&body),
            })
        }
    }

    /// Insert a settings row (seeding only).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, setting), fields(key = %setting.key))]
    pub async fn insert_setting(&self, setting: &NewSetting) -> Result<Setting, BackendError> {
        self.insert("site_settings", setting).await
    }
}

/// Insert payload for a settings row.
#[derive(Debug, Clone, Serialize)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
    pub category: String,
}
