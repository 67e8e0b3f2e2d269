//! Account registration, user-code lookup and coach linking.

use serde::{Deserialize, Serialize};

use super::user_code::{generate_user_code, UserCode};
use super::{ServiceError, ServiceResult};
use crate::auth::{AuthProvider, AuthSession, SignUpMetadata};
use crate::db::models::{Profile, Role, UserId};
use crate::db::{FullRepository, RepositoryError};

/// Attempts at finding an unused user code before giving up.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Sign-up request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A created account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredAccount {
    pub profile: Profile,
    /// `None` when the auth service requires email confirmation first
    pub session: Option<AuthSession>,
}

/// Create the auth account and its profile with a fresh user code.
pub async fn register<R, A>(
    repo: &R,
    auth: &A,
    request: &Registration,
) -> ServiceResult<RegisteredAccount>
where
    R: FullRepository + ?Sized,
    A: AuthProvider + ?Sized,
{
    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return Err(ServiceError::validation("full_name must not be empty"));
    }

    let registration = auth
        .sign_up(
            &request.email,
            &request.password,
            &SignUpMetadata {
                full_name: full_name.to_string(),
                role: request.role,
            },
        )
        .await?;

    let user_code = unused_user_code(repo).await?;
    let profile = Profile {
        id: registration.user.id,
        email: registration.user.email.clone(),
        full_name: full_name.to_string(),
        role: request.role,
        user_code: user_code.to_string(),
        coach_id: None,
        timezone: request
            .timezone
            .as_deref()
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .map(str::to_string),
        created_at: None,
    };
    let profile = repo.create_profile(&profile).await?;
    log::info!(
        "Registered {} {} with code {}",
        profile.role,
        profile.id,
        profile.user_code
    );

    Ok(RegisteredAccount {
        profile,
        session: registration.session,
    })
}

async fn unused_user_code<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<UserCode> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_user_code();
        if repo.find_profile_by_code(code.as_str()).await?.is_none() {
            return Ok(code);
        }
        log::debug!("User code {} already taken, retrying", code);
    }
    Err(RepositoryError::internal("could not allocate an unused user code").into())
}

/// Profile owning `code`. The code is normalized first; a malformed code is a
/// validation error and no lookup is made.
pub async fn find_by_code<R: FullRepository + ?Sized>(
    repo: &R,
    code: &str,
) -> ServiceResult<Profile> {
    let code = UserCode::parse(code)?;
    repo.find_profile_by_code(code.as_str())
        .await?
        .ok_or_else(|| {
            RepositoryError::not_found(format!("No profile with user code {}", code))
                .with_operation("find_by_code")
                .with_entity("profile")
                .into()
        })
}

/// Link an athlete to the coach owning `coach_code`.
pub async fn link_athlete_to_coach<R: FullRepository + ?Sized>(
    repo: &R,
    athlete_id: UserId,
    coach_code: &str,
) -> ServiceResult<Profile> {
    let code = UserCode::parse(coach_code)?;

    let athlete = repo.get_profile(athlete_id).await?;
    if athlete.role != Role::Athlete {
        return Err(ServiceError::forbidden("only athletes can link to a coach"));
    }

    let coach = find_by_code(repo, code.as_str()).await?;
    if !coach.is_coach() {
        return Err(ServiceError::validation(format!(
            "user code {} does not belong to a coach",
            code
        )));
    }

    let updated = repo.set_coach(athlete_id, coach.id).await?;
    log::info!("Linked athlete {} to coach {}", athlete_id, coach.id);
    Ok(updated)
}

/// Check that `viewer_id` may read or change data of `athlete_id`.
///
/// Athletes may access their own data; coaches may access athletes whose
/// `coach_id` points at them. Returns the athlete's profile.
pub async fn ensure_athlete_access<R: FullRepository + ?Sized>(
    repo: &R,
    viewer_id: UserId,
    athlete_id: UserId,
) -> ServiceResult<Profile> {
    let athlete = repo.get_profile(athlete_id).await?;
    if viewer_id == athlete_id || athlete.coach_id == Some(viewer_id) {
        return Ok(athlete);
    }
    Err(ServiceError::forbidden(format!(
        "no access to athlete {}",
        athlete_id
    )))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
