//! Profile repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{Profile, UserId};

/// Repository trait for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Store a new profile.
    ///
    /// # Returns
    /// * `Ok(Profile)` - The stored row as returned by the store
    /// * `Err(RepositoryError::ValidationError)` - If the id or user code is already taken
    async fn create_profile(&self, profile: &Profile) -> RepositoryResult<Profile>;

    /// Retrieve a profile by user id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no profile exists for the user
    async fn get_profile(&self, user_id: UserId) -> RepositoryResult<Profile>;

    /// Find the profile owning a normalized user code.
    async fn find_profile_by_code(&self, user_code: &str) -> RepositoryResult<Option<Profile>>;

    /// All athletes whose `coach_id` is `coach_id`, ordered by name.
    async fn list_athletes_for_coach(&self, coach_id: UserId) -> RepositoryResult<Vec<Profile>>;

    /// Set the coach of an athlete and return the updated profile.
    async fn set_coach(&self, athlete_id: UserId, coach_id: UserId) -> RepositoryResult<Profile>;
}
