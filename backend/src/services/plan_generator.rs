//! The generate-plan flow: build the skeleton, have the text generator label
//! it, persist the result as the user's active plan.
//!
//! Any failure aborts the whole flow. Nothing is persisted unless the reply
//! was usable, and the generator is called exactly once.

use tracing::{error, info};

use crate::api::{NewStudyPlan, StudentProfile, StudyPlan, UserId, WeekSkeleton};
use crate::db::checksum::profile_checksum;
use crate::db::repository::{PlanRepository, RepositoryError};
use crate::generation::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::generation::response::{parse_reply, ResponseError};
use crate::generation::TextGenerator;
use crate::scheduler;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("text generator failed: {0:#}")]
    Generator(anyhow::Error),
    #[error("text generator reply unusable: {0}")]
    Reply(#[from] ResponseError),
    #[error("failed to store plan: {0}")]
    Repository(#[from] RepositoryError),
}

/// The skeleton for `profile`, without labels. Never fails.
pub fn preview(profile: &StudentProfile) -> WeekSkeleton {
    scheduler::build(profile)
}

/// Generate and store a new active plan for `user_id`.
///
/// # Returns
/// * `Ok(StudyPlan)` - The stored plan; any previous plan is no longer active
/// * `Err(PlanError)` - Nothing new was stored
pub async fn generate_plan<R>(
    repo: &R,
    generator: &dyn TextGenerator,
    user_id: UserId,
    profile: &StudentProfile,
) -> Result<StudyPlan, PlanError>
where
    R: PlanRepository + ?Sized,
{
    let skeleton = scheduler::build(profile);
    let prompt = build_prompt(profile, &skeleton);

    let reply = generator
        .complete(SYSTEM_PROMPT, &prompt)
        .await
        .map_err(|e| {
            error!(%user_id, error = %format!("{:#}", e), "Text generator call failed");
            PlanError::Generator(e)
        })?;

    let generated = parse_reply(&reply, &skeleton).inspect_err(|e| {
        error!(%user_id, error = %e, reply_chars = reply.len(), "Unusable text generator reply");
    })?;

    let plan = NewStudyPlan {
        user_id,
        profile: profile.clone(),
        profile_checksum: profile_checksum(profile),
        days: generated.days,
        narrative: generated.narrative,
    };
    let stored = repo.activate_plan(&plan).await.inspect_err(|e| {
        error!(%user_id, error = %e, "Failed to store generated plan");
    })?;

    info!(
        %user_id,
        plan_id = %stored.id,
        study_blocks = skeleton.placeholder_count(),
        unfilled = generated.unfilled,
        "Generated study plan"
    );
    Ok(stored)
}
