//! Auth service errors.

use maison_core::EmailError;
use thiserror::Error;

use crate::backend::BackendError;

/// Errors surfaced by the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password rejected by the auth surface.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Password does not meet the minimum length.
    #[error("password must be at least {min} characters")]
    WeakPassword {
        /// Minimum accepted length.
        min: usize,
    },

    /// Full name missing or too short.
    #[error("full name must be at least {min} characters")]
    InvalidFullName {
        /// Minimum accepted length.
        min: usize,
    },

    /// Structurally invalid email.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    /// Any other backend failure.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
