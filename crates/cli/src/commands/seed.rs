//! Site-settings seeding.
//!
//! The admin settings screen only rewrites values, so the singleton rows
//! must exist up front. Inserts any missing row with its default value;
//! existing rows are never touched.

use maison_admin::backend::{AdminClient, BackendError, NewSetting};
use maison_admin::config::{AdminConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The full settings catalog: (key, default value, category).
const DEFAULT_SETTINGS: &[(&str, &str, &str)] = &[
    ("site_name", "Maison", "general"),
    ("site_logo", "", "general"),
    ("site_description", "", "general"),
    ("contact_email", "", "contact"),
    ("contact_phone", "", "contact"),
    ("contact_address", "", "contact"),
    ("instagram_url", "", "social"),
    ("facebook_url", "", "social"),
    ("twitter_url", "", "social"),
    ("youtube_url", "", "social"),
    ("linkedin_url", "", "social"),
    ("tiktok_url", "", "social"),
    ("whatsapp_number", "", "social"),
    ("telegram_url", "", "social"),
    ("currency", "USD", "commerce"),
    ("currency_symbol", "$", "commerce"),
    ("free_shipping_threshold", "0", "commerce"),
    ("tax_rate", "0", "commerce"),
    ("meta_title", "", "seo"),
    ("meta_description", "", "seo"),
    ("meta_keywords", "", "seo"),
    ("google_analytics_id", "", "analytics"),
    ("facebook_pixel_id", "", "analytics"),
];

/// Insert missing site-settings rows.
///
/// # Errors
///
/// Returns an error if configuration is missing or a backend call fails.
pub async fn settings() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let config = AdminConfig::from_env()?;
    let backend = AdminClient::new(&config.backend);

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for &(key, value, category) in DEFAULT_SETTINGS {
        if backend.setting_by_key(key).await?.is_some() {
            skipped += 1;
            continue;
        }

        backend
            .insert_setting(&NewSetting {
                key: key.to_string(),
                value: value.to_string(),
                category: category.to_string(),
            })
            .await?;
        tracing::info!("Seeded setting: {key}");
        inserted += 1;
    }

    tracing::info!("Settings seed complete: {inserted} inserted, {skipped} already present");
    Ok(())
}
