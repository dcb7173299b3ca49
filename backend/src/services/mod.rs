//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository traits. They
//! take the repository and the request's caller explicitly and never read
//! global state.

pub mod plan_generator;
pub mod progress;
pub mod roster;

pub use plan_generator::{generate_plan, preview, PlanError};
pub use progress::{summarize_week, week_start, weekly_summary};
pub use roster::{accept_invite, create_invite, ensure_can_view, list_students, RosterError};
