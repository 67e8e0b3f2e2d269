//! Authentication collaborator.
//!
//! [`AuthProvider`] abstracts the hosted auth service: password sign-up and
//! sign-in, sign-out and resolving a bearer token to its user. Two
//! implementations exist:
//!
//! - [`LocalAuthProvider`]: in-memory accounts with salted SHA-256 password
//!   hashes and random bearer tokens
//! - `RemoteAuthProvider` (`remote-backend` feature): the hosted auth REST API
//!
//! Profiles are not created here; `services::accounts::register` pairs a
//! successful sign-up with the profile row.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::models::{Role, UserId};

pub mod local;
#[cfg(feature = "remote-backend")]
pub mod remote;

pub use local::LocalAuthProvider;
#[cfg(feature = "remote-backend")]
pub use remote::RemoteAuthProvider;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Errors raised by an [`AuthProvider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("{0}")]
    Validation(String),

    #[error("auth service failure: {0}")]
    Upstream(String),

    #[error("unexpected auth service response: {0}")]
    Decode(String),
}

/// Identity of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Tokens issued by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Seconds until `access_token` expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Result of a sign-up. `session` is `None` when the service requires the
/// email address to be confirmed before the first sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRegistration {
    pub user: AuthUser,
    pub session: Option<AuthSession>,
}

/// Profile data attached to a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    pub full_name: String,
    pub role: Role,
}

/// Hosted authentication service.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account.
    ///
    /// # Returns
    /// * `Err(AuthError::EmailTaken)` - If the email is already registered
    /// * `Err(AuthError::Validation)` - For a malformed email or weak password
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<AuthRegistration, AuthError>;

    /// Exchange email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Revoke an access token. Unknown tokens are not an error.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Resolve an access token; `None` when it is unknown or expired.
    async fn current_session(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError>;
}

/// Trim and lower-case an email address, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(AuthError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )))
    }
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
