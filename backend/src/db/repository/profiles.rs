//! User profile persistence.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Profile, UserId};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The profile row for `user_id`, or `None` if the user has none yet.
    async fn get_profile(&self, user_id: UserId) -> RepositoryResult<Option<Profile>>;

    /// Insert or replace the profile row keyed by `profile.id`.
    async fn upsert_profile(&self, profile: &Profile) -> RepositoryResult<Profile>;

    /// Student profiles, sorted by name.
    ///
    /// # Arguments
    /// * `coach_id` - Only students linked to this coach; `None` lists every student
    async fn list_students(&self, coach_id: Option<UserId>) -> RepositoryResult<Vec<Profile>>;

    /// Link a student to a coach.
    ///
    /// # Returns
    /// * `Ok(Profile)` - The updated student profile
    /// * `Err(RepositoryError::NotFound)` - If the student has no profile row
    async fn set_coach(&self, student_id: UserId, coach_id: UserId) -> RepositoryResult<Profile>;
}
