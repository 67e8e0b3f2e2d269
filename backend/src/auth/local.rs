//! In-memory auth provider for local development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use super::{
    normalize_email, validate_password, AuthError, AuthProvider, AuthRegistration, AuthSession,
    AuthUser, SignUpMetadata,
};
use crate::db::models::{Role, UserId};

/// Lifetime of issued access tokens.
pub const TOKEN_TTL_SECS: u64 = 3600;

/// Salted SHA-256 of a password, hex encoded.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Equality that inspects every byte regardless of where the first
/// difference is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn random_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone)]
struct Account {
    user: AuthUser,
    salt: String,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct IssuedToken {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct AuthState {
    /// Keyed by normalized email
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, IssuedToken>,
}

/// In-memory [`AuthProvider`].
///
/// Accounts live as long as the provider. Sign-up signs the user in
/// immediately (no email confirmation step).
#[derive(Debug, Default)]
pub struct LocalAuthProvider {
    state: RwLock<AuthState>,
}

impl Account {
    fn verify(&self, password: &str) -> bool {
        constant_time_eq(
            hash_password(&self.salt, password).as_bytes(),
            self.password_hash.as_bytes(),
        )
    }
}

impl LocalAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_count(&self) -> usize {
        self.state.read().accounts.len()
    }

    /// Issue a fresh token, dropping any that have already expired.
    fn issue_session(state: &mut AuthState, user: &AuthUser) -> AuthSession {
        let now = Utc::now();
        state.tokens.retain(|_, issued| issued.expires_at > now);

        let access_token = random_token();
        state.tokens.insert(
            access_token.clone(),
            IssuedToken {
                user_id: user.id,
                expires_at: now + Duration::seconds(TOKEN_TTL_SECS as i64),
            },
        );
        AuthSession {
            access_token,
            refresh_token: Some(random_token()),
            expires_in: Some(TOKEN_TTL_SECS),
            user: user.clone(),
        }
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<AuthRegistration, AuthError> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let mut state = self.state.write();
        if state.accounts.contains_key(&email) {
            return Err(AuthError::EmailTaken);
        }

        let salt = random_token();
        let user = AuthUser {
            id: UserId::random(),
            email: email.clone(),
            role: Some(metadata.role),
        };
        state.accounts.insert(
            email,
            Account {
                user: user.clone(),
                password_hash: hash_password(&salt, password),
                salt,
            },
        );
        let session = Self::issue_session(&mut state, &user);
        log::debug!("Registered local account {}", user.id);

        Ok(AuthRegistration {
            user,
            session: Some(session),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let mut state = self.state.write();
        let user = match state.accounts.get(&email) {
            Some(account) if account.verify(password) => account.user.clone(),
            _ => return Err(AuthError::InvalidCredentials),
        };
        Ok(Self::issue_session(&mut state, &user))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.state.write().tokens.remove(access_token);
        Ok(())
    }

    async fn current_session(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        let mut state = self.state.write();
        let issued = match state.tokens.get(access_token) {
            Some(issued) => issued.clone(),
            None => return Ok(None),
        };
        if issued.expires_at <= Utc::now() {
            state.tokens.remove(access_token);
            return Ok(None);
        }
        Ok(state
            .accounts
            .values()
            .find(|account| account.user.id == issued.user_id)
            .map(|account| account.user.clone()))
    }
}

impl LocalAuthProvider {
    /// Role recorded at sign-up for `user_id`.
    pub fn role_of(&self, user_id: UserId) -> Option<Role> {
        self.state
            .read()
            .accounts
            .values()
            .find(|account| account.user.id == user_id)
            .and_then(|account| account.user.role)
    }
}
