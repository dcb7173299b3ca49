//! Coach rosters: invites, students and who may see whose data.

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::api::{Invite, NewInvite, Profile, Role, UserId};
use crate::auth::RequestContext;
use crate::db::repository::{InviteRepository, ProfileRepository, RepositoryError};

/// Length of an invite code.
pub const INVITE_CODE_LEN: usize = 8;
/// How long an invite stays redeemable.
pub const INVITE_VALID_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("only coaches and admins can {0}")]
    NotStaff(&'static str),
    #[error("only students can accept invites")]
    NotStudent,
    #[error("invite not found")]
    InviteNotFound,
    #[error("invite has already been used")]
    InviteUsed,
    #[error("invite has expired")]
    InviteExpired,
    #[error("not allowed to view this user's data")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Random uppercase alphanumeric code of [`INVITE_CODE_LEN`] characters.
pub fn generate_invite_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(INVITE_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Issue a new invite from the calling coach, valid for [`INVITE_VALID_DAYS`].
pub async fn create_invite<R>(
    repo: &R,
    ctx: &RequestContext,
    now: DateTime<Utc>,
) -> Result<Invite, RosterError>
where
    R: InviteRepository + ?Sized,
{
    if !ctx.role.is_staff() {
        return Err(RosterError::NotStaff("create invites"));
    }

    let invite = repo
        .insert_invite(&NewInvite {
            code: generate_invite_code(),
            coach_id: ctx.user_id,
            expires_at: now + Duration::days(INVITE_VALID_DAYS),
        })
        .await?;
    info!(coach_id = %ctx.user_id, code = %invite.code, "Created invite");
    Ok(invite)
}

/// Redeem `code` for the calling student and link them to the coach.
///
/// # Returns
/// * `Ok(Profile)` - The student's profile, now carrying the coach
/// * `Err(RosterError)` - Wrong role, or the invite is unknown, used or expired
pub async fn accept_invite<R>(
    repo: &R,
    ctx: &RequestContext,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Profile, RosterError>
where
    R: InviteRepository + ProfileRepository + ?Sized,
{
    if ctx.role != Role::Student {
        return Err(RosterError::NotStudent);
    }

    let invite = repo
        .find_invite(code)
        .await?
        .ok_or(RosterError::InviteNotFound)?;
    if invite.is_used() {
        return Err(RosterError::InviteUsed);
    }
    if invite.is_expired(now) {
        return Err(RosterError::InviteExpired);
    }

    match repo.mark_invite_used(invite.id, ctx.user_id, now).await {
        Ok(_) => {}
        // Lost a race with another redemption.
        Err(RepositoryError::ValidationError { .. }) => return Err(RosterError::InviteUsed),
        Err(e) => return Err(e.into()),
    }

    if repo.get_profile(ctx.user_id).await?.is_none() {
        let name = ctx.email.clone().unwrap_or_else(|| "Student".to_string());
        repo.upsert_profile(&Profile::new_student(ctx.user_id, name))
            .await?;
    }
    let profile = repo.set_coach(ctx.user_id, invite.coach_id).await?;

    info!(student_id = %ctx.user_id, coach_id = %invite.coach_id, "Invite accepted");
    Ok(profile)
}

/// Students the caller may manage: a coach's own students, or every
/// student for an admin.
pub async fn list_students<R>(repo: &R, ctx: &RequestContext) -> Result<Vec<Profile>, RosterError>
where
    R: ProfileRepository + ?Sized,
{
    let coach = match ctx.role {
        Role::Admin => None,
        Role::Coach => Some(ctx.user_id),
        Role::Student => return Err(RosterError::NotStaff("list students")),
    };
    Ok(repo.list_students(coach).await?)
}

/// Allow access to `target`'s data for the user themselves, any admin and
/// the target's coach.
pub async fn ensure_can_view<R>(
    repo: &R,
    ctx: &RequestContext,
    target: UserId,
) -> Result<(), RosterError>
where
    R: ProfileRepository + ?Sized,
{
    if target == ctx.user_id || ctx.role == Role::Admin {
        return Ok(());
    }
    if ctx.role == Role::Coach {
        let coached = repo
            .get_profile(target)
            .await?
            .is_some_and(|p| p.coach_id == Some(ctx.user_id));
        if coached {
            return Ok(());
        }
    }
    Err(RosterError::Forbidden)
}
