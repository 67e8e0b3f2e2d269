//! Auth provider backed by the hosted auth REST API (`/auth/v1`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    normalize_email, validate_password, AuthError, AuthProvider, AuthRegistration, AuthSession,
    AuthUser, SignUpMetadata,
};
use crate::db::models::{Role, UserId};
use crate::remote::{RemoteClient, RemoteError};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: &'a SignUpMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl UserBody {
    fn into_user(self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.unwrap_or_default(),
            role: self.user_metadata.and_then(|m| m.role),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    user: UserBody,
}

impl SessionBody {
    fn into_session(self) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            user: self.user.into_user(),
        }
    }
}

/// Sign-up answers with a session when confirmation is disabled, otherwise
/// with the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(SessionBody),
    User(UserBody),
}

/// [`AuthProvider`] over the hosted auth service.
#[derive(Debug, Clone)]
pub struct RemoteAuthProvider {
    client: RemoteClient,
}

impl RemoteAuthProvider {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

fn is_email_taken(body: &str) -> bool {
    let body = body.to_lowercase();
    body.contains("already registered") || body.contains("already exists")
}

/// Map a failure of the auth API.
///
/// `bad_request_is_credentials` selects how 400/401 are read: as rejected
/// credentials (sign-in) or as a validation message (sign-up).
fn map_error(err: RemoteError, bad_request_is_credentials: bool) -> AuthError {
    match err {
        RemoteError::Status { status, body, .. } => match status {
            400 | 401 if bad_request_is_credentials => AuthError::InvalidCredentials,
            400 | 409 | 422 if is_email_taken(&body) => AuthError::EmailTaken,
            400 | 422 => AuthError::Validation(upstream_message(&body)),
            _ => AuthError::Upstream(format!("HTTP {}", status)),
        },
        RemoteError::Decode { source, .. } => AuthError::Decode(source.to_string()),
        other => AuthError::Upstream(other.to_string()),
    }
}

/// Human-readable message from an auth error body.
fn upstream_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "msg", alias = "error_description", alias = "message")]
        text: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.text)
        .unwrap_or_else(|| "request rejected by auth service".to_string())
}

#[async_trait]
impl AuthProvider for RemoteAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<AuthRegistration, AuthError> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let body = SignUpBody {
            email: &email,
            password,
            data: metadata,
        };
        let response: SignUpResponse = self
            .client
            .auth_post("signup", &[], &body, None)
            .await
            .map_err(|e| map_error(e, false))?;

        let registration = match response {
            SignUpResponse::Session(session) => {
                let session = session.into_session();
                AuthRegistration {
                    user: session.user.clone(),
                    session: Some(session),
                }
            }
            SignUpResponse::User(user) => AuthRegistration {
                user: user.into_user(),
                session: None,
            },
        };
        log::info!("Registered account {}", registration.user.id);
        Ok(registration)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let body = Credentials {
            email: &email,
            password,
        };
        let session: SessionBody = self
            .client
            .auth_post("token", &[("grant_type", "password")], &body, None)
            .await
            .map_err(|e| map_error(e, true))?;
        Ok(session.into_session())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        match self.client.auth_post_empty("logout", access_token).await {
            Ok(()) => Ok(()),
            Err(RemoteError::Status { status: 401 | 403 | 404, .. }) => {
                log::debug!("Sign-out of an already invalid token");
                Ok(())
            }
            Err(e) => Err(map_error(e, false)),
        }
    }

    async fn current_session(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        match self.client.auth_get::<UserBody>("user", access_token).await {
            Ok(user) => Ok(Some(user.into_user())),
            Err(RemoteError::Status { status: 401 | 403 | 404, .. }) => Ok(None),
            Err(e) => Err(map_error(e, false)),
        }
    }
}
