//! Weekly plan persistence.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewStudyPlan, PlanId, PlanSummary, StudyPlan, UserId};

/// Repository trait for generated weekly plans.
///
/// A user has at most one active plan. Storing a plan always goes through
/// [`PlanRepository::activate_plan`], which also retires the previous one.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Plan Operations ====================

    /// Store `plan` as the user's new active plan and deactivate any plan
    /// that was active before.
    ///
    /// # Returns
    /// * `Ok(StudyPlan)` - The stored plan with its assigned id
    /// * `Err(RepositoryError)` - If the insert failed; nothing was stored
    async fn activate_plan(&self, plan: &NewStudyPlan) -> RepositoryResult<StudyPlan>;

    /// The user's active plan, if any. When more than one row is marked
    /// active the newest one wins.
    async fn get_active_plan(&self, user_id: UserId) -> RepositoryResult<Option<StudyPlan>>;

    /// All of the user's plans, newest first.
    async fn list_plans(&self, user_id: UserId) -> RepositoryResult<Vec<PlanSummary>>;

    /// Retrieve a plan by id.
    ///
    /// # Returns
    /// * `Ok(StudyPlan)` - The plan
    /// * `Err(RepositoryError::NotFound)` - If no plan has this id
    async fn get_plan(&self, plan_id: PlanId) -> RepositoryResult<StudyPlan>;
}
