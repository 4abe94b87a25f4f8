//! Auth/role gate service.
//!
//! One injectable object owns the whole account lifecycle: sign-in,
//! sign-up, sign-out, and per-request authorization. Authorization is a
//! single authoritative sequence - resolve the identity behind the token
//! first, await it, then (only if an identity exists) look up the admin
//! role. There is no second async source racing the first, so the gate
//! never publishes a half-settled answer.
//!
//! The role check fails closed: any error or absence of the role row
//! means "not admin", never "admin".

mod error;

pub use error::AuthError;

use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use maison_core::Email;

use crate::backend::{AdminClient, AuthClient, AuthUser, BackendError, Session};

/// Minimum password length accepted at sign-up.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum full-name length accepted at sign-up.
const MIN_FULL_NAME_LENGTH: usize = 2;

/// How long a gate decision stays cached per token.
const GATE_DECISION_TTL: Duration = Duration::from_secs(60);

/// Outcome of gating a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// No usable session behind the token.
    Unauthenticated,
    /// Authenticated but not an admin (includes role-check failures).
    Denied(AuthUser),
    /// Authenticated admin.
    Admin(AuthUser),
}

impl Gate {
    /// Whether the gate grants back-office access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }
}

/// Auth/role gate service.
///
/// Owned by the application state and passed by reference to whatever
/// needs it; never ambient global state.
pub struct AuthService {
    auth: AuthClient,
    backend: AdminClient,
    decisions: Cache<String, Gate>,
    public_url: String,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(auth: AuthClient, backend: AdminClient, public_url: impl Into<String>) -> Self {
        let decisions = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(GATE_DECISION_TTL)
            .build();

        Self {
            auth,
            backend,
            decisions,
            public_url: public_url.into(),
        }
    }

    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the backend rejects
    /// the pair; other failures pass through as backend errors.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        self.auth
            .sign_in(email.as_str(), password)
            .await
            .map_err(|e| match e {
                BackendError::Api { ref message, .. }
                    if message.contains("Invalid login credentials") =>
                {
                    AuthError::InvalidCredentials
                }
                other => AuthError::Backend(other),
            })
    }

    /// Create an account.
    ///
    /// The welcome redirect points at the public storefront origin, and
    /// the full name travels as account metadata.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` for duplicate emails and
    /// validation errors before any network call.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthUser, AuthError> {
        let email = Email::parse(email)?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let full_name = full_name.trim();
        if full_name.len() < MIN_FULL_NAME_LENGTH {
            return Err(AuthError::InvalidFullName {
                min: MIN_FULL_NAME_LENGTH,
            });
        }

        let redirect_to = format!("{}/", self.public_url);

        self.auth
            .sign_up(email.as_str(), password, full_name, &redirect_to)
            .await
            .map_err(|e| match e {
                BackendError::Api { ref message, .. }
                    if message.contains("already registered") =>
                {
                    AuthError::EmailTaken
                }
                other => AuthError::Backend(other),
            })
    }

    /// Revoke the session behind a token. Failures are swallowed; the
    /// caller is logging out either way.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) {
        if let Err(e) = self.auth.sign_out(access_token).await {
            tracing::warn!(error = %e, "Sign-out call failed");
        }
        self.decisions.invalidate(access_token).await;
    }

    // =========================================================================
    // Gate
    // =========================================================================

    /// Resolve the gate decision for an access token.
    ///
    /// Sequence: identity lookup first; only when it yields a user is the
    /// role association queried. Role-check errors are swallowed and
    /// reported as [`Gate::Denied`].
    #[instrument(skip(self, access_token))]
    pub async fn authorize(&self, access_token: &str) -> Gate {
        if let Some(decision) = self.decisions.get(access_token).await {
            return decision;
        }

        let user = match self.auth.get_user(access_token).await {
            Ok(user) => user,
            Err(e) => {
                if !e.is_unauthorized() {
                    tracing::warn!(error = %e, "Session resolution failed");
                }
                let decision = Gate::Unauthenticated;
                self.decisions
                    .insert(access_token.to_string(), decision.clone())
                    .await;
                return decision;
            }
        };

        let decision = match self.backend.has_admin_role(user.id).await {
            Ok(true) => Gate::Admin(user),
            Ok(false) => Gate::Denied(user),
            Err(e) => {
                tracing::warn!(error = %e, "Role check failed; denying access");
                Gate::Denied(user)
            }
        };

        self.decisions
            .insert(access_token.to_string(), decision.clone())
            .await;
        decision
    }
}
