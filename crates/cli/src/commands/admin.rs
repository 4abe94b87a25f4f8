//! Fixed admin account provisioning.
//!
//! # Usage
//!
//! ```bash
//! maison-cli admin ensure
//! ```
//!
//! # Environment Variables
//!
//! - `MAISON_BACKEND_URL` / `MAISON_BACKEND_SERVICE_KEY` - backend access
//! - `MAISON_ADMIN_EMAIL` - account email (default: admin@example.com)
//! - `MAISON_ADMIN_PASSWORD` - account password (default: 123456)
//!
//! Idempotent: an existing account is left alone and only the role row is
//! topped up. Prints the `{success, message, email, password}` contract
//! consumed by the provisioning tooling.

use maison_admin::backend::{AdminClient, AuthClient, BackendError};
use maison_admin::config::{AdminConfig, ConfigError};
use thiserror::Error;

/// Default seed account, overridable via environment.
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_PASSWORD: &str = "123456";

/// Errors that can occur during provisioning.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Ensure the fixed admin account exists and holds the admin role.
///
/// # Errors
///
/// Returns an error if configuration is missing or a backend call fails;
/// the failure contract `{success: false, error}` is printed first.
pub async fn ensure() -> Result<(), ProvisionError> {
    dotenvy::dotenv().ok();

    let email =
        std::env::var("MAISON_ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    let password = std::env::var("MAISON_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

    match provision(&email, &password).await {
        Ok(message) => {
            print_contract(&serde_json::json!({
                "success": true,
                "message": message,
                "email": email,
                "password": password,
            }));
            Ok(())
        }
        Err(e) => {
            print_contract(&serde_json::json!({
                "success": false,
                "error": e.to_string(),
            }));
            Err(e)
        }
    }
}

async fn provision(email: &str, password: &str) -> Result<&'static str, ProvisionError> {
    let config = AdminConfig::from_env()?;
    let auth = AuthClient::new(&config.backend);
    let backend = AdminClient::new(&config.backend);

    tracing::info!("Ensuring admin account: {email}");

    let (user, message) = match auth.find_user_by_email(email).await? {
        Some(existing) => {
            tracing::info!("Admin user already exists, ensuring role");
            (existing, "Admin user already exists, role ensured")
        }
        None => {
            let created = auth.create_user(email, password, "Site Administrator").await?;
            tracing::info!("Created admin user: {}", created.id);
            (created, "Admin user created")
        }
    };

    if backend.ensure_admin_role(user.id).await? {
        tracing::info!("Admin role granted");
    } else {
        tracing::info!("Admin role already present");
    }

    Ok(message)
}

#[allow(clippy::print_stdout)] // provisioning tooling parses stdout
fn print_contract(value: &serde_json::Value) {
    println!("{value}");
}
