//! HTTP handlers for the REST API.
//!
//! Each handler takes the caller as an explicit [`RequestContext`] and
//! delegates to the repository or the service layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::dto::{
    CreateBookRequest, CreateReadingRecordRequest, CreateSourceRequest, CreateStudyRecordRequest,
    GeneratePlanResponse, HealthResponse, PlanListResponse, StudentListResponse, StudyRecordQuery,
    TopicQuery, UpdateProfileRequest, UserQuery, WeeklyStatsQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    Book, Invite, PlanId, Profile, ReadingRecord, Source, StudentProfile, StudyPlan, StudyRecord,
    StudyRecordId, Topic, UserId, WeekSkeleton, WeeklySummary,
};
use crate::auth::RequestContext;
use crate::db::repository::{
    BookRepository, PlanRepository, ProfileRepository, RecordRepository, SourceRepository,
    TopicRepository,
};
use crate::services::{plan_generator, progress, roster};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// The user whose data is being read: `requested` when given and visible to
/// the caller, otherwise the caller.
async fn target_user(
    state: &AppState,
    ctx: &RequestContext,
    requested: Option<UserId>,
) -> Result<UserId, AppError> {
    let target = requested.unwrap_or(ctx.user_id);
    roster::ensure_can_view(state.repository.as_ref(), ctx, target).await?;
    Ok(target)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Plans
// =============================================================================

/// POST /v1/plans/generate
///
/// Build the skeleton for the posted profile, have it labeled and store it
/// as the caller's active plan.
pub async fn generate_plan(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(profile): Json<StudentProfile>,
) -> Result<(StatusCode, Json<GeneratePlanResponse>), AppError> {
    let plan = plan_generator::generate_plan(
        state.repository.as_ref(),
        state.generator.as_ref(),
        ctx.user_id,
        &profile,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(GeneratePlanResponse {
            plan_id: plan.id,
            plan,
        }),
    ))
}

/// POST /v1/plans/skeleton
///
/// The unlabeled skeleton for the posted profile. Nothing is stored.
pub async fn preview_skeleton(
    _ctx: RequestContext,
    Json(profile): Json<StudentProfile>,
) -> HandlerResult<WeekSkeleton> {
    Ok(Json(plan_generator::preview(&profile)))
}

/// GET /v1/plans
pub async fn list_plans(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<UserQuery>,
) -> HandlerResult<PlanListResponse> {
    let user_id = target_user(&state, &ctx, query.user_id).await?;
    let plans = state.repository.list_plans(user_id).await?;
    let total = plans.len();
    Ok(Json(PlanListResponse { plans, total }))
}

/// GET /v1/plans/active
pub async fn get_active_plan(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<UserQuery>,
) -> HandlerResult<StudyPlan> {
    let user_id = target_user(&state, &ctx, query.user_id).await?;
    state
        .repository
        .get_active_plan(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No active plan for user {}", user_id)))
}

/// GET /v1/plans/{plan_id}
pub async fn get_plan(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(plan_id): Path<i64>,
) -> HandlerResult<StudyPlan> {
    let plan = state.repository.get_plan(PlanId::new(plan_id)).await?;
    roster::ensure_can_view(state.repository.as_ref(), &ctx, plan.user_id).await?;
    Ok(Json(plan))
}

// =============================================================================
// Profile
// =============================================================================

/// GET /v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> HandlerResult<Profile> {
    state
        .repository
        .get_profile(ctx.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Profile not created yet".to_string()))
}

/// PUT /v1/profile
///
/// Create or update the caller's name and grade. Role and coach are kept.
pub async fn put_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<UpdateProfileRequest>,
) -> HandlerResult<Profile> {
    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("full_name must not be empty".to_string()));
    }

    let mut profile = match state.repository.get_profile(ctx.user_id).await? {
        Some(existing) => existing,
        None => Profile {
            role: ctx.role,
            ..Profile::new_student(ctx.user_id, full_name)
        },
    };
    profile.full_name = full_name.to_string();
    profile.grade = request.grade.filter(|g| !g.trim().is_empty());

    Ok(Json(state.repository.upsert_profile(&profile).await?))
}

// =============================================================================
// Study and reading records
// =============================================================================

/// GET /v1/study-records
pub async fn list_study_records(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<StudyRecordQuery>,
) -> HandlerResult<Vec<StudyRecord>> {
    let user_id = target_user(&state, &ctx, query.user_id).await?;
    let records = state
        .repository
        .list_study_records(user_id, query.from, query.to)
        .await?;
    Ok(Json(records))
}

/// POST /v1/study-records
pub async fn create_study_record(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateStudyRecordRequest>,
) -> Result<(StatusCode, Json<StudyRecord>), AppError> {
    let record = request.into_new(ctx.user_id);
    record.validate().map_err(AppError::BadRequest)?;
    let stored = state.repository.insert_study_record(&record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /v1/study-records/{record_id}
///
/// Only the record's owner may delete it.
pub async fn delete_study_record(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(record_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let record_id = StudyRecordId::new(record_id);
    let record = state.repository.get_study_record(record_id).await?;
    if record.user_id != ctx.user_id {
        return Err(AppError::Forbidden(
            "Only the owner can delete a study record".to_string(),
        ));
    }
    state.repository.delete_study_record(record_id).await?;
    info!(user_id = %ctx.user_id, record_id = %record_id, "Deleted study record");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/reading-records
pub async fn list_reading_records(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<UserQuery>,
) -> HandlerResult<Vec<ReadingRecord>> {
    let user_id = target_user(&state, &ctx, query.user_id).await?;
    Ok(Json(state.repository.list_reading_records(user_id).await?))
}

/// POST /v1/reading-records
///
/// The book must belong to the caller.
pub async fn create_reading_record(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateReadingRecordRequest>,
) -> Result<(StatusCode, Json<ReadingRecord>), AppError> {
    let record = request.into_new(ctx.user_id);
    record.validate().map_err(AppError::BadRequest)?;

    let book = state.repository.get_book(record.book_id).await?;
    if book.user_id != ctx.user_id {
        return Err(AppError::BadRequest(format!(
            "Book {} does not belong to the caller",
            book.id
        )));
    }

    let stored = state.repository.insert_reading_record(&record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

// =============================================================================
// Books, sources and topics
// =============================================================================

/// GET /v1/books
pub async fn list_books(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<UserQuery>,
) -> HandlerResult<Vec<Book>> {
    let user_id = target_user(&state, &ctx, query.user_id).await?;
    Ok(Json(state.repository.list_books(user_id).await?))
}

/// POST /v1/books
pub async fn create_book(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = request.into_new(ctx.user_id);
    book.validate().map_err(AppError::BadRequest)?;
    Ok((StatusCode::CREATED, Json(state.repository.insert_book(&book).await?)))
}

/// GET /v1/sources
pub async fn list_sources(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<UserQuery>,
) -> HandlerResult<Vec<Source>> {
    let user_id = target_user(&state, &ctx, query.user_id).await?;
    Ok(Json(state.repository.list_sources(user_id).await?))
}

/// POST /v1/sources
pub async fn create_source(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateSourceRequest>,
) -> Result<(StatusCode, Json<Source>), AppError> {
    let source = request.into_new(ctx.user_id);
    source.validate().map_err(AppError::BadRequest)?;
    Ok((
        StatusCode::CREATED,
        Json(state.repository.insert_source(&source).await?),
    ))
}

/// GET /v1/topics
pub async fn list_topics(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Query(query): Query<TopicQuery>,
) -> HandlerResult<Vec<Topic>> {
    let subject = query.subject.as_deref().map(str::trim).filter(|s| !s.is_empty());
    Ok(Json(state.repository.list_topics(subject).await?))
}

// =============================================================================
// Roster
// =============================================================================

/// POST /v1/invites
pub async fn create_invite(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<(StatusCode, Json<Invite>), AppError> {
    let invite = roster::create_invite(state.repository.as_ref(), &ctx, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(invite)))
}

/// POST /v1/invites/{code}/accept
pub async fn accept_invite(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(code): Path<String>,
) -> HandlerResult<Profile> {
    let profile =
        roster::accept_invite(state.repository.as_ref(), &ctx, code.trim(), Utc::now()).await?;
    Ok(Json(profile))
}

/// GET /v1/students
pub async fn list_students(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> HandlerResult<StudentListResponse> {
    let students = roster::list_students(state.repository.as_ref(), &ctx).await?;
    let total = students.len();
    Ok(Json(StudentListResponse { students, total }))
}

// =============================================================================
// Statistics
// =============================================================================

/// GET /v1/stats/weekly
pub async fn weekly_stats(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<WeeklyStatsQuery>,
) -> HandlerResult<WeeklySummary> {
    let user_id = target_user(&state, &ctx, query.user_id).await?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = progress::weekly_summary(state.repository.as_ref(), user_id, date).await?;
    Ok(Json(summary))
}
