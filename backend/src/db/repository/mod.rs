//! Repository trait definitions for the planner's persistence layer.
//!
//! Each entity gets its own focused trait so that implementations and test
//! doubles stay small. Rows are validated into typed entities at this
//! boundary; callers never see raw backend JSON.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`plans`]: Weekly plans and the one-active-plan rule
//! - [`profiles`]: User profiles, roles and coach links
//! - [`records`]: Study and reading records
//! - [`books`]: Books a student reads from
//! - [`invites`]: Coach invite codes
//! - [`catalog`]: Study sources and curriculum topics
//!
//! # Convenience Trait Bound
//!
//! For code that needs every capability, use [`FullRepository`]:
//!
//! ```ignore
//! async fn latest<R: FullRepository + ?Sized>(repo: &R, user: UserId) -> RepositoryResult<()> {
//!     let plan = repo.get_active_plan(user).await?;
//!     let records = repo.list_study_records(user, None, None).await?;
//!     Ok(())
//! }
//! ```

pub mod books;
pub mod catalog;
pub mod error;
pub mod invites;
pub mod plans;
pub mod profiles;
pub mod records;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use books::BookRepository;
pub use catalog::{SourceRepository, TopicRepository};
pub use invites::InviteRepository;
pub use plans::PlanRepository;
pub use profiles::ProfileRepository;
pub use records::RecordRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements every entity
/// trait below.
pub trait FullRepository:
    PlanRepository
    + ProfileRepository
    + RecordRepository
    + BookRepository
    + InviteRepository
    + SourceRepository
    + TopicRepository
{
}

impl<T> FullRepository for T where
    T: PlanRepository
        + ProfileRepository
        + RecordRepository
        + BookRepository
        + InviteRepository
        + SourceRepository
        + TopicRepository
{
}
