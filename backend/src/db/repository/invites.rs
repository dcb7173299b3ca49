//! Coach invite persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::{Invite, InviteId, NewInvite, UserId};

#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Store a new invite. Codes are unique; a duplicate is a validation error.
    async fn insert_invite(&self, invite: &NewInvite) -> RepositoryResult<Invite>;

    /// Look up an invite by its code, case-insensitively.
    async fn find_invite(&self, code: &str) -> RepositoryResult<Option<Invite>>;

    /// Record that `student_id` redeemed the invite at `used_at`.
    ///
    /// # Returns
    /// * `Ok(Invite)` - The updated invite
    /// * `Err(RepositoryError::NotFound)` - If no invite has this id
    /// * `Err(RepositoryError::ValidationError)` - If it was already used
    async fn mark_invite_used(
        &self,
        invite_id: InviteId,
        student_id: UserId,
        used_at: DateTime<Utc>,
    ) -> RepositoryResult<Invite>;
}
