//! Auth-surface client.
//!
//! Covers the password grant, sign-up, logout, and current-user lookup
//! used by the gate, plus the service-key user administration used by
//! `maison-cli admin ensure`.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use maison_core::UserId;

use crate::backend::{BackendError, api_message};
use crate::config::BackendConfig;

/// An authenticated identity as returned by the auth surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata; `full_name` is set at sign-up.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// A token pair plus the identity it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Client for the hosted backend's auth surface.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                service_key: config.service_key.expose_secret().to_string(),
            }),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.base_url)
    }

    async fn read_success(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(BackendError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            })
        }
    }

    /// Password-grant sign in.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with the backend's message (e.g.
    /// "Invalid login credentials") on rejection.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.inner.service_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create an account with a welcome redirect and full-name metadata.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with the backend's message (e.g.
    /// "User already registered") on rejection.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        redirect_to: &str,
    ) -> Result<AuthUser, BackendError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("signup"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.inner.service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await?;

        let body = Self::read_success(response).await?;

        // The signup payload is either the bare user or `{"user": ...}`
        // depending on whether email confirmation is enabled.
        #[derive(Deserialize)]
        struct Wrapped {
            user: AuthUser,
        }

        if let Ok(user) = serde_json::from_str::<AuthUser>(&body) {
            return Ok(user);
        }
        let wrapped: Wrapped = serde_json::from_str(&body)?;
        Ok(wrapped.user)
    }

    /// Revoke the session behind an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.inner.service_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::read_success(response).await.map(|_| ())
    }

    /// Resolve the identity behind an access token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with status 401 for unknown or expired
    /// tokens.
    #[instrument(skip(self, access_token))]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let response = self
            .inner
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.inner.service_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // User administration (service key)
    // =========================================================================

    /// Find a user by email via the admin listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, BackendError> {
        #[derive(Deserialize)]
        struct UserList {
            #[serde(default)]
            users: Vec<AuthUser>,
        }

        let response = self
            .inner
            .client
            .get(self.auth_url("admin/users"))
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        let list: UserList = serde_json::from_str(&body)?;

        let email = email.to_lowercase();
        Ok(list
            .users
            .into_iter()
            .find(|u| u.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(&email))))
    }

    /// Create a confirmed user with metadata (provisioning).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthUser, BackendError> {
        let response = self
            .inner
            .client
            .post(self.auth_url("admin/users"))
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "user_metadata": { "full_name": full_name },
            }))
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
