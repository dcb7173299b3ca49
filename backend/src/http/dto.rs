//! Data Transfer Objects for the HTTP API.
//!
//! Entities travel as-is; these types cover request bodies, query strings
//! and list envelopes. Request bodies never carry a user id: the owner is
//! always the authenticated caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{
    BookId, NewBook, NewReadingRecord, NewSource, NewStudyRecord, PlanId, PlanSummary, Profile,
    SourceId, SourceKind, StudyPlan, UserId,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `connected`, `disconnected` or `error: ...`
    pub database: String,
}

/// Response for a generated plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    pub plan_id: PlanId,
    pub plan: StudyPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanListResponse {
    pub plans: Vec<PlanSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<Profile>,
    pub total: usize,
}

// =============================================================================
// Query strings
// =============================================================================

/// Whose data to read; defaults to the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyRecordQuery {
    pub user_id: Option<UserId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicQuery {
    pub subject: Option<String>,
}

/// Week to summarize, given by any date in it; defaults to today.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeeklyStatsQuery {
    pub user_id: Option<UserId>,
    pub date: Option<NaiveDate>,
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    #[serde(default)]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudyRecordRequest {
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
}

impl CreateStudyRecordRequest {
    pub fn into_new(self, user_id: UserId) -> NewStudyRecord {
        NewStudyRecord {
            user_id,
            date: self.date,
            subject: self.subject,
            topic: self.topic,
            source_id: self.source_id,
            minutes: self.minutes,
            questions_solved: self.questions_solved,
            correct_answers: self.correct_answers,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReadingRecordRequest {
    pub book_id: BookId,
    pub date: NaiveDate,
    pub pages: u32,
    #[serde(default)]
    pub minutes: u32,
}

impl CreateReadingRecordRequest {
    pub fn into_new(self, user_id: UserId) -> NewReadingRecord {
        NewReadingRecord {
            user_id,
            book_id: self.book_id,
            date: self.date,
            pages: self.pages,
            minutes: self.minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub total_pages: u32,
}

impl CreateBookRequest {
    pub fn into_new(self, user_id: UserId) -> NewBook {
        NewBook {
            user_id,
            title: self.title,
            author: self.author,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub kind: SourceKind,
}

impl CreateSourceRequest {
    pub fn into_new(self, user_id: UserId) -> NewSource {
        NewSource {
            user_id,
            name: self.name,
            subject: self.subject,
            kind: self.kind,
        }
    }
}
