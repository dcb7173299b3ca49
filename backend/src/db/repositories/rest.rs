//! Repository backed by the hosted backend's table API.
//!
//! The hosted backend exposes its tables through a PostgREST-style HTTP
//! interface under `{base_url}/rest/v1/{table}`. Filters travel as query
//! parameters (`user_id=eq.<uuid>`), writes ask for the affected rows back
//! with `Prefer: return=representation`.
//!
//! Every row is deserialized into its typed entity here; a row that does not
//! fit is reported as a validation error.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::*;
use crate::db::repo_config::RestConfig;
use crate::db::repository::*;

const PLANS: &str = "study_plans";
const PROFILES: &str = "profiles";
const STUDY_RECORDS: &str = "study_records";
const READING_RECORDS: &str = "reading_records";
const BOOKS: &str = "books";
const INVITES: &str = "invites";
const SOURCES: &str = "sources";
const TOPICS: &str = "topics";

/// Repository talking to the hosted backend over HTTP.
#[derive(Clone)]
pub struct RestRepository {
    client: Client,
    config: RestConfig,
}

#[derive(Serialize)]
struct PlanInsert<'a> {
    #[serde(flatten)]
    plan: &'a NewStudyPlan,
    is_active: bool,
}

impl RestRepository {
    pub fn new(config: RestConfig) -> RepositoryResult<Self> {
        if config.base_url.is_empty() || config.api_key.is_empty() {
            return Err(RepositoryError::configuration(
                "Hosted backend requires both a base URL and a service key",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RepositoryError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.config.base_url, table);
        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Send a request and decode the returned rows.
    async fn rows<T: DeserializeOwned>(
        &self,
        operation: &str,
        table: &str,
        request: RequestBuilder,
    ) -> RepositoryResult<Vec<T>> {
        let context = || ErrorContext::new(operation).with_entity(table);

        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

        if !status.is_success() {
            debug!(operation, table, %status, "Backend rejected request");
            return Err(status_error(status, body, context()));
        }

        serde_json::from_str(&body).map_err(|e| {
            RepositoryError::validation_with_context(
                format!("Unexpected {} row shape: {}", table, e),
                context(),
            )
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        operation: &str,
        table: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<Vec<T>> {
        let request = self.request(Method::GET, table).query(query);
        self.rows(operation, table, request).await
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        operation: &str,
        table: &str,
        id: impl ToString,
    ) -> RepositoryResult<T> {
        let id = id.to_string();
        let query = [("id", format!("eq.{}", id)), ("limit", "1".to_string())];
        self.select(operation, table, &query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(operation, table, id))
    }

    async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &str,
        table: &str,
        body: &B,
    ) -> RepositoryResult<T> {
        let request = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(body);
        self.rows(operation, table, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                RepositoryError::internal_with_context(
                    "Insert returned no row",
                    ErrorContext::new(operation).with_entity(table),
                )
            })
    }

    async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &str,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> RepositoryResult<Vec<T>> {
        let request = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(query)
            .json(body);
        self.rows(operation, table, request).await
    }
}

fn not_found(operation: &str, table: &str, id: impl ToString) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("{} row not found", table),
        ErrorContext::new(operation)
            .with_entity(table)
            .with_entity_id(id),
    )
}

fn invalid(operation: &str, table: &str, message: String) -> RepositoryError {
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new(operation).with_entity(table),
    )
}

/// Map a non-success status to the matching repository error.
fn status_error(status: StatusCode, body: String, context: ErrorContext) -> RepositoryError {
    let context = context.with_details(format!("status={}", status.as_u16()));
    match status {
        StatusCode::NOT_FOUND => RepositoryError::not_found_with_context(body, context),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            RepositoryError::validation_with_context(body, context)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::ConfigurationError {
            message: format!("Backend refused the service key: {}", body),
            context,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RepositoryError::TimeoutError {
                message: body,
                context: context.retryable(),
            }
        }
        s if s.is_server_error() => RepositoryError::query_with_context(body, context.retryable()),
        _ => RepositoryError::query_with_context(body, context),
    }
}

fn eq(value: impl ToString) -> String {
    format!("eq.{}", value.to_string())
}

#[async_trait]
impl PlanRepository for RestRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let response = self
            .request(Method::GET, PLANS)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("health_check"))?;
        Ok(response.status().is_success())
    }

    async fn activate_plan(&self, plan: &NewStudyPlan) -> RepositoryResult<StudyPlan> {
        let row = PlanInsert {
            plan,
            is_active: true,
        };
        let stored: StudyPlan = self.insert("activate_plan", PLANS, &row).await?;

        // The new row is already active; retiring the older ones is best effort.
        let query = [
            ("user_id", eq(plan.user_id)),
            ("is_active", eq(true)),
            ("id", format!("neq.{}", stored.id)),
        ];
        let body = serde_json::json!({ "is_active": false });
        if let Err(e) = self
            .update::<_, serde_json::Value>("activate_plan", PLANS, &query, &body)
            .await
        {
            warn!(
                user_id = %plan.user_id,
                plan_id = %stored.id,
                error = %e,
                "Failed to deactivate previous plans"
            );
        }

        Ok(stored)
    }

    async fn get_active_plan(&self, user_id: UserId) -> RepositoryResult<Option<StudyPlan>> {
        let query = [
            ("user_id", eq(user_id)),
            ("is_active", eq(true)),
            ("order", "created_at.desc,id.desc".to_string()),
            ("limit", "1".to_string()),
        ];
        let plans: Vec<StudyPlan> = self.select("get_active_plan", PLANS, &query).await?;
        Ok(plans.into_iter().next())
    }

    async fn list_plans(&self, user_id: UserId) -> RepositoryResult<Vec<PlanSummary>> {
        let query = [
            ("select", "id,created_at,is_active,profile_checksum".to_string()),
            ("user_id", eq(user_id)),
            ("order", "created_at.desc,id.desc".to_string()),
        ];
        self.select("list_plans", PLANS, &query).await
    }

    async fn get_plan(&self, plan_id: PlanId) -> RepositoryResult<StudyPlan> {
        self.select_one("get_plan", PLANS, plan_id).await
    }
}

#[async_trait]
impl ProfileRepository for RestRepository {
    async fn get_profile(&self, user_id: UserId) -> RepositoryResult<Option<Profile>> {
        let query = [("id", eq(user_id)), ("limit", "1".to_string())];
        let rows: Vec<Profile> = self.select("get_profile", PROFILES, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(&self, profile: &Profile) -> RepositoryResult<Profile> {
        if profile.full_name.trim().is_empty() {
            return Err(invalid("upsert_profile", PROFILES, "full_name must not be empty".into()));
        }
        let request = self
            .request(Method::POST, PROFILES)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(profile);
        self.rows::<Profile>("upsert_profile", PROFILES, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found("upsert_profile", PROFILES, profile.id))
    }

    async fn list_students(&self, coach_id: Option<UserId>) -> RepositoryResult<Vec<Profile>> {
        let mut query = vec![
            ("role", eq("student")),
            ("order", "full_name.asc,id.asc".to_string()),
        ];
        if let Some(coach_id) = coach_id {
            query.push(("coach_id", eq(coach_id)));
        }
        self.select("list_students", PROFILES, &query).await
    }

    async fn set_coach(&self, student_id: UserId, coach_id: UserId) -> RepositoryResult<Profile> {
        let query = [("id", eq(student_id))];
        let body = serde_json::json!({ "coach_id": coach_id });
        self.update::<_, Profile>("set_coach", PROFILES, &query, &body)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found("set_coach", PROFILES, student_id))
    }
}

#[async_trait]
impl RecordRepository for RestRepository {
    async fn insert_study_record(&self, record: &NewStudyRecord) -> RepositoryResult<StudyRecord> {
        record
            .validate()
            .map_err(|e| invalid("insert_study_record", STUDY_RECORDS, e))?;
        self.insert("insert_study_record", STUDY_RECORDS, record).await
    }

    async fn list_study_records(
        &self,
        user_id: UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<StudyRecord>> {
        let mut query = vec![
            ("user_id", eq(user_id)),
            ("order", "date.asc,id.asc".to_string()),
        ];
        if let Some(from) = from {
            query.push(("date", format!("gte.{}", from)));
        }
        if let Some(to) = to {
            query.push(("date", format!("lte.{}", to)));
        }
        self.select("list_study_records", STUDY_RECORDS, &query).await
    }

    async fn get_study_record(&self, record_id: StudyRecordId) -> RepositoryResult<StudyRecord> {
        self.select_one("get_study_record", STUDY_RECORDS, record_id).await
    }

    async fn delete_study_record(&self, record_id: StudyRecordId) -> RepositoryResult<()> {
        let request = self
            .request(Method::DELETE, STUDY_RECORDS)
            .header("Prefer", "return=representation")
            .query(&[("id", eq(record_id))]);
        let deleted: Vec<serde_json::Value> =
            self.rows("delete_study_record", STUDY_RECORDS, request).await?;
        if deleted.is_empty() {
            return Err(not_found("delete_study_record", STUDY_RECORDS, record_id));
        }
        Ok(())
    }

    async fn insert_reading_record(
        &self,
        record: &NewReadingRecord,
    ) -> RepositoryResult<ReadingRecord> {
        record
            .validate()
            .map_err(|e| invalid("insert_reading_record", READING_RECORDS, e))?;
        self.insert("insert_reading_record", READING_RECORDS, record).await
    }

    async fn list_reading_records(&self, user_id: UserId) -> RepositoryResult<Vec<ReadingRecord>> {
        let query = [
            ("user_id", eq(user_id)),
            ("order", "date.asc,id.asc".to_string()),
        ];
        self.select("list_reading_records", READING_RECORDS, &query).await
    }
}

#[async_trait]
impl BookRepository for RestRepository {
    async fn insert_book(&self, book: &NewBook) -> RepositoryResult<Book> {
        book.validate().map_err(|e| invalid("insert_book", BOOKS, e))?;
        self.insert("insert_book", BOOKS, book).await
    }

    async fn list_books(&self, user_id: UserId) -> RepositoryResult<Vec<Book>> {
        let query = [("user_id", eq(user_id)), ("order", "id.asc".to_string())];
        self.select("list_books", BOOKS, &query).await
    }

    async fn get_book(&self, book_id: BookId) -> RepositoryResult<Book> {
        self.select_one("get_book", BOOKS, book_id).await
    }
}

#[async_trait]
impl InviteRepository for RestRepository {
    async fn insert_invite(&self, invite: &NewInvite) -> RepositoryResult<Invite> {
        self.insert("insert_invite", INVITES, invite).await
    }

    async fn find_invite(&self, code: &str) -> RepositoryResult<Option<Invite>> {
        let query = [
            ("code", eq(code.trim().to_uppercase())),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<Invite> = self.select("find_invite", INVITES, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn mark_invite_used(
        &self,
        invite_id: InviteId,
        student_id: UserId,
        used_at: DateTime<Utc>,
    ) -> RepositoryResult<Invite> {
        // The `used_by=is.null` filter makes the claim conditional.
        let query = [("id", eq(invite_id)), ("used_by", "is.null".to_string())];
        let body = serde_json::json!({ "used_by": student_id, "used_at": used_at });
        let updated: Vec<Invite> = self
            .update("mark_invite_used", INVITES, &query, &body)
            .await?;
        if let Some(invite) = updated.into_iter().next() {
            return Ok(invite);
        }

        let existing: Invite = self.select_one("mark_invite_used", INVITES, invite_id).await?;
        Err(invalid(
            "mark_invite_used",
            INVITES,
            format!("invite {} was already used", existing.code),
        ))
    }
}

#[async_trait]
impl SourceRepository for RestRepository {
    async fn insert_source(&self, source: &NewSource) -> RepositoryResult<Source> {
        source
            .validate()
            .map_err(|e| invalid("insert_source", SOURCES, e))?;
        self.insert("insert_source", SOURCES, source).await
    }

    async fn list_sources(&self, user_id: UserId) -> RepositoryResult<Vec<Source>> {
        let query = [
            ("user_id", eq(user_id)),
            ("order", "subject.asc,name.asc".to_string()),
        ];
        self.select("list_sources", SOURCES, &query).await
    }
}

#[async_trait]
impl TopicRepository for RestRepository {
    async fn list_topics(&self, subject: Option<&str>) -> RepositoryResult<Vec<Topic>> {
        let mut query = vec![("order", "subject.asc,name.asc".to_string())];
        if let Some(subject) = subject {
            query.push(("subject", format!("ilike.{}", subject.trim())));
        }
        self.select("list_topics", TOPICS, &query).await
    }
}
