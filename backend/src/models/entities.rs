//! Typed rows of the hosted backend's tables.
//!
//! Rows are deserialized into these types right at the repository boundary;
//! a row that does not fit is a validation error there, not a surprise
//! further down the call chain.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::profile::StudentProfile;
use super::schedule::DaySchedule;
use crate::api::{BookId, InviteId, PlanId, ReadingRecordId, SourceId, StudyRecordId, TopicId, UserId};

/// Account role, stored on the profile row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Coach,
    Admin,
}

impl Role {
    /// Coaches and admins manage rosters and invites.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Coach | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "coach" => Ok(Role::Coach),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {:?}", s)),
        }
    }
}

/// A user's profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub coach_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh student profile, used when a verified user has no row yet.
    pub fn new_student(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            role: Role::Student,
            grade: None,
            coach_id: None,
            created_at: Utc::now(),
        }
    }
}

/// One logged study session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: StudyRecordId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub subject: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub source_id: Option<SourceId>,
    pub minutes: u32,
    #[serde(default)]
    pub questions_solved: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for [`StudyRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudyRecord {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub subject: String,
    pub topic: Option<String>,
    pub source_id: Option<SourceId>,
    pub minutes: u32,
    pub questions_solved: u32,
    pub correct_answers: u32,
    pub notes: Option<String>,
}

impl NewStudyRecord {
    /// Check the invariants the tables rely on.
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("subject must not be empty".to_string());
        }
        if self.minutes == 0 || self.minutes > 24 * 60 {
            return Err("minutes must be between 1 and 1440".to_string());
        }
        if self.correct_answers > self.questions_solved {
            return Err("correct_answers cannot exceed questions_solved".to_string());
        }
        Ok(())
    }
}

/// Pages read from a book in one sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub id: ReadingRecordId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub date: NaiveDate,
    pub pages: u32,
    #[serde(default)]
    pub minutes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReadingRecord {
    pub user_id: UserId,
    pub book_id: BookId,
    pub date: NaiveDate,
    pub pages: u32,
    pub minutes: u32,
}

impl NewReadingRecord {
    pub fn validate(&self) -> Result<(), String> {
        if self.pages == 0 {
            return Err("pages must be positive".to_string());
        }
        if self.minutes > 24 * 60 {
            return Err("minutes must not exceed 1440".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub total_pages: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub user_id: UserId,
    pub title: String,
    pub author: Option<String>,
    pub total_pages: u32,
}

impl NewBook {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.total_pages == 0 {
            return Err("total_pages must be positive".to_string());
        }
        Ok(())
    }
}

/// Coach-issued code that links a student to the coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    pub id: InviteId,
    pub code: String,
    pub coach_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub used_by: Option<UserId>,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
}

impl Invite {
    pub fn is_used(&self) -> bool {
        self.used_by.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvite {
    pub code: String,
    pub coach_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Kind of study material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    QuestionBank,
    Textbook,
    Video,
    #[default]
    Other,
}

/// Study material a student works from (question bank, textbook, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub user_id: UserId,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub kind: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSource {
    pub user_id: UserId,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub kind: SourceKind,
}

impl NewSource {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.subject.trim().is_empty() {
            return Err("name and subject must not be empty".to_string());
        }
        Ok(())
    }
}

/// Curriculum topic within a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub subject: String,
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
}

/// Narrative fields the text generator appends to a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanNarrative {
    pub summary: String,
    pub tips: Vec<String>,
    pub weekly_goals: Vec<String>,
}

/// A persisted weekly plan. At most one plan per user is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub id: PlanId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub profile: StudentProfile,
    pub profile_checksum: String,
    pub days: Vec<DaySchedule>,
    #[serde(default)]
    pub narrative: PlanNarrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudyPlan {
    pub user_id: UserId,
    pub profile: StudentProfile,
    pub profile_checksum: String,
    pub days: Vec<DaySchedule>,
    pub narrative: PlanNarrative,
}

/// Lightweight plan listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: PlanId,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub profile_checksum: String,
}

impl From<&StudyPlan> for PlanSummary {
    fn from(plan: &StudyPlan) -> Self {
        Self {
            id: plan.id,
            created_at: plan.created_at,
            is_active: plan.is_active,
            profile_checksum: plan.profile_checksum.clone(),
        }
    }
}
