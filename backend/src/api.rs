//! Public API surface for the backend.
//!
//! This file consolidates identifier types and re-exports the domain types
//! that travel over the HTTP API. All types derive Serialize/Deserialize for
//! JSON serialization.

pub use crate::models::entities::{
    Book, Invite, NewBook, NewInvite, NewReadingRecord, NewSource, NewStudyPlan, NewStudyRecord,
    PlanNarrative, PlanSummary, Profile, ReadingRecord, Role, Source, SourceKind, StudyPlan,
    StudyRecord, Topic,
};
pub use crate::models::profile::{StudentProfile, Tempo};
pub use crate::models::schedule::{
    BlockKind, DaySchedule, TimeBlock, WeekSkeleton, Weekday, PLACEHOLDER_ACTIVITY,
};
pub use crate::models::time::ClockTime;
pub use crate::services::progress::{DailyTotals, SubjectTotals, WeeklySummary};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

crate::define_id_type!(i64, PlanId);
crate::define_id_type!(i64, StudyRecordId);
crate::define_id_type!(i64, ReadingRecordId);
crate::define_id_type!(i64, BookId);
crate::define_id_type!(i64, InviteId);
crate::define_id_type!(i64, SourceId);
crate::define_id_type!(i64, TopicId);

/// User identifier issued by the auth collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new(value: Uuid) -> Self {
        UserId(value)
    }

    /// Random id, for tests and local development.
    pub fn new_v4() -> Self {
        UserId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(UserId)
    }
}

impl From<Uuid> for UserId {
    fn from(v: Uuid) -> Self {
        UserId(v)
    }
}
