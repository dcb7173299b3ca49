//! In-memory local repository implementation.
//!
//! Stores every entity in `HashMap`s behind a single `parking_lot::RwLock`.
//! Used by the test suite and for local development without the hosted
//! backend. Plan activation runs under one write lock, so readers never
//! observe two active plans for a user.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::*;
use crate::db::repository::*;

/// In-memory local repository.
///
/// # Example
/// ```ignore
/// use study_planner::db::repositories::LocalRepository;
///
/// #[tokio::test]
/// async fn test_plan_storage() {
///     let repo = LocalRepository::new();
///     repo.seed_topics([("Math", "Derivatives")]);
///
///     let topics = repo.list_topics(Some("math")).await.unwrap();
///     assert_eq!(topics.len(), 1);
/// }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    plans: HashMap<PlanId, StudyPlan>,
    profiles: HashMap<UserId, Profile>,
    study_records: HashMap<StudyRecordId, StudyRecord>,
    reading_records: HashMap<ReadingRecordId, ReadingRecord>,
    books: HashMap<BookId, Book>,
    invites: HashMap<InviteId, Invite>,
    sources: HashMap<SourceId, Source>,
    topics: Vec<Topic>,

    // ID counter shared by all tables
    next_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            plans: HashMap::new(),
            profiles: HashMap::new(),
            study_records: HashMap::new(),
            reading_records: HashMap::new(),
            books: HashMap::new(),
            invites: HashMap::new(),
            sources: HashMap::new(),
            topics: Vec::new(),
            next_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Replace the topic catalog. Topic ids are assigned in order.
    pub fn seed_topics<I, S>(&self, topics: I)
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut data = self.data.write();
        let mut seeded = Vec::new();
        for (subject, name) in topics {
            let id = TopicId(data.next_id());
            seeded.push(Topic {
                id,
                subject: subject.into(),
                name: name.into(),
                grade: None,
            });
        }
        data.topics = seeded;
    }

    /// Number of stored plans, active or not.
    pub fn plan_count(&self) -> usize {
        self.data.read().plans.len()
    }

    /// Number of active plans for `user_id`.
    pub fn active_plan_count(&self, user_id: UserId) -> usize {
        self.data
            .read()
            .plans
            .values()
            .filter(|p| p.user_id == user_id && p.is_active)
            .count()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Local repository is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(operation: &str, entity: &str, id: impl ToString) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("{} not found", entity),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

fn invalid(operation: &str, entity: &str, message: String) -> RepositoryError {
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new(operation).with_entity(entity),
    )
}

fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
}

#[async_trait]
impl PlanRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn activate_plan(&self, plan: &NewStudyPlan) -> RepositoryResult<StudyPlan> {
        self.check_health()?;

        let mut data = self.data.write();
        for existing in data.plans.values_mut() {
            if existing.user_id == plan.user_id {
                existing.is_active = false;
            }
        }

        let id = PlanId(data.next_id());
        let stored = StudyPlan {
            id,
            user_id: plan.user_id,
            created_at: Utc::now(),
            is_active: true,
            profile: plan.profile.clone(),
            profile_checksum: plan.profile_checksum.clone(),
            days: plan.days.clone(),
            narrative: plan.narrative.clone(),
        };
        data.plans.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_active_plan(&self, user_id: UserId) -> RepositoryResult<Option<StudyPlan>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .plans
            .values()
            .filter(|p| p.user_id == user_id && p.is_active)
            .max_by_key(|p| (p.created_at, p.id))
            .cloned())
    }

    async fn list_plans(&self, user_id: UserId) -> RepositoryResult<Vec<PlanSummary>> {
        self.check_health()?;
        let data = self.data.read();
        let mut plans: Vec<&StudyPlan> = data.plans.values().filter(|p| p.user_id == user_id).collect();
        plans.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id)));
        Ok(plans.into_iter().map(PlanSummary::from).collect())
    }

    async fn get_plan(&self, plan_id: PlanId) -> RepositoryResult<StudyPlan> {
        self.check_health()?;
        self.data
            .read()
            .plans
            .get(&plan_id)
            .cloned()
            .ok_or_else(|| not_found("get_plan", "plan", plan_id))
    }
}

#[async_trait]
impl ProfileRepository for LocalRepository {
    async fn get_profile(&self, user_id: UserId) -> RepositoryResult<Option<Profile>> {
        self.check_health()?;
        Ok(self.data.read().profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> RepositoryResult<Profile> {
        self.check_health()?;
        if profile.full_name.trim().is_empty() {
            return Err(invalid("upsert_profile", "profile", "full_name must not be empty".into()));
        }
        self.data.write().profiles.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn list_students(&self, coach_id: Option<UserId>) -> RepositoryResult<Vec<Profile>> {
        self.check_health()?;
        let data = self.data.read();
        let mut students: Vec<Profile> = data
            .profiles
            .values()
            .filter(|p| p.role == Role::Student)
            .filter(|p| coach_id.is_none() || p.coach_id == coach_id)
            .cloned()
            .collect();
        students.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
        Ok(students)
    }

    async fn set_coach(&self, student_id: UserId, coach_id: UserId) -> RepositoryResult<Profile> {
        self.check_health()?;
        let mut data = self.data.write();
        let profile = data
            .profiles
            .get_mut(&student_id)
            .ok_or_else(|| not_found("set_coach", "profile", student_id))?;
        profile.coach_id = Some(coach_id);
        Ok(profile.clone())
    }
}

#[async_trait]
impl RecordRepository for LocalRepository {
    async fn insert_study_record(&self, record: &NewStudyRecord) -> RepositoryResult<StudyRecord> {
        self.check_health()?;
        record
            .validate()
            .map_err(|e| invalid("insert_study_record", "study_record", e))?;

        let mut data = self.data.write();
        let id = StudyRecordId(data.next_id());
        let stored = StudyRecord {
            id,
            user_id: record.user_id,
            date: record.date,
            subject: record.subject.trim().to_string(),
            topic: record.topic.clone(),
            source_id: record.source_id,
            minutes: record.minutes,
            questions_solved: record.questions_solved,
            correct_answers: record.correct_answers,
            notes: record.notes.clone(),
            created_at: Utc::now(),
        };
        data.study_records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_study_records(
        &self,
        user_id: UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<StudyRecord>> {
        self.check_health()?;
        let data = self.data.read();
        let mut records: Vec<StudyRecord> = data
            .study_records
            .values()
            .filter(|r| r.user_id == user_id && in_range(r.date, from, to))
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.date, r.id));
        Ok(records)
    }

    async fn get_study_record(&self, record_id: StudyRecordId) -> RepositoryResult<StudyRecord> {
        self.check_health()?;
        self.data
            .read()
            .study_records
            .get(&record_id)
            .cloned()
            .ok_or_else(|| not_found("get_study_record", "study_record", record_id))
    }

    async fn delete_study_record(&self, record_id: StudyRecordId) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .study_records
            .remove(&record_id)
            .map(|_| ())
            .ok_or_else(|| not_found("delete_study_record", "study_record", record_id))
    }

    async fn insert_reading_record(
        &self,
        record: &NewReadingRecord,
    ) -> RepositoryResult<ReadingRecord> {
        self.check_health()?;
        record
            .validate()
            .map_err(|e| invalid("insert_reading_record", "reading_record", e))?;

        let mut data = self.data.write();
        match data.books.get(&record.book_id) {
            Some(book) if book.user_id == record.user_id => {}
            _ => return Err(not_found("insert_reading_record", "book", record.book_id)),
        }

        let id = ReadingRecordId(data.next_id());
        let stored = ReadingRecord {
            id,
            user_id: record.user_id,
            book_id: record.book_id,
            date: record.date,
            pages: record.pages,
            minutes: record.minutes,
            created_at: Utc::now(),
        };
        data.reading_records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_reading_records(&self, user_id: UserId) -> RepositoryResult<Vec<ReadingRecord>> {
        self.check_health()?;
        let data = self.data.read();
        let mut records: Vec<ReadingRecord> = data
            .reading_records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.date, r.id));
        Ok(records)
    }
}

#[async_trait]
impl BookRepository for LocalRepository {
    async fn insert_book(&self, book: &NewBook) -> RepositoryResult<Book> {
        self.check_health()?;
        book.validate().map_err(|e| invalid("insert_book", "book", e))?;

        let mut data = self.data.write();
        let id = BookId(data.next_id());
        let stored = Book {
            id,
            user_id: book.user_id,
            title: book.title.trim().to_string(),
            author: book.author.clone(),
            total_pages: book.total_pages,
            created_at: Utc::now(),
        };
        data.books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_books(&self, user_id: UserId) -> RepositoryResult<Vec<Book>> {
        self.check_health()?;
        let data = self.data.read();
        let mut books: Vec<Book> = data
            .books
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        books.sort_by_key(|b| b.id);
        Ok(books)
    }

    async fn get_book(&self, book_id: BookId) -> RepositoryResult<Book> {
        self.check_health()?;
        self.data
            .read()
            .books
            .get(&book_id)
            .cloned()
            .ok_or_else(|| not_found("get_book", "book", book_id))
    }
}

#[async_trait]
impl InviteRepository for LocalRepository {
    async fn insert_invite(&self, invite: &NewInvite) -> RepositoryResult<Invite> {
        self.check_health()?;
        let mut data = self.data.write();
        if data
            .invites
            .values()
            .any(|i| i.code.eq_ignore_ascii_case(&invite.code))
        {
            return Err(invalid(
                "insert_invite",
                "invite",
                format!("invite code {} already exists", invite.code),
            ));
        }

        let id = InviteId(data.next_id());
        let stored = Invite {
            id,
            code: invite.code.clone(),
            coach_id: invite.coach_id,
            created_at: Utc::now(),
            expires_at: invite.expires_at,
            used_by: None,
            used_at: None,
        };
        data.invites.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_invite(&self, code: &str) -> RepositoryResult<Option<Invite>> {
        self.check_health()?;
        let code = code.trim();
        Ok(self
            .data
            .read()
            .invites
            .values()
            .find(|i| i.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn mark_invite_used(
        &self,
        invite_id: InviteId,
        student_id: UserId,
        used_at: DateTime<Utc>,
    ) -> RepositoryResult<Invite> {
        self.check_health()?;
        let mut data = self.data.write();
        let invite = data
            .invites
            .get_mut(&invite_id)
            .ok_or_else(|| not_found("mark_invite_used", "invite", invite_id))?;
        if invite.is_used() {
            return Err(invalid(
                "mark_invite_used",
                "invite",
                format!("invite {} was already used", invite.code),
            ));
        }
        invite.used_by = Some(student_id);
        invite.used_at = Some(used_at);
        Ok(invite.clone())
    }
}

#[async_trait]
impl SourceRepository for LocalRepository {
    async fn insert_source(&self, source: &NewSource) -> RepositoryResult<Source> {
        self.check_health()?;
        source
            .validate()
            .map_err(|e| invalid("insert_source", "source", e))?;

        let mut data = self.data.write();
        let id = SourceId(data.next_id());
        let stored = Source {
            id,
            user_id: source.user_id,
            name: source.name.trim().to_string(),
            subject: source.subject.trim().to_string(),
            kind: source.kind,
        };
        data.sources.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_sources(&self, user_id: UserId) -> RepositoryResult<Vec<Source>> {
        self.check_health()?;
        let data = self.data.read();
        let mut sources: Vec<Source> = data
            .sources
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sources.sort_by(|a, b| a.subject.cmp(&b.subject).then_with(|| a.name.cmp(&b.name)));
        Ok(sources)
    }
}

#[async_trait]
impl TopicRepository for LocalRepository {
    async fn list_topics(&self, subject: Option<&str>) -> RepositoryResult<Vec<Topic>> {
        self.check_health()?;
        let data = self.data.read();
        let mut topics: Vec<Topic> = data
            .topics
            .iter()
            .filter(|t| subject.map_or(true, |s| t.subject.eq_ignore_ascii_case(s.trim())))
            .cloned()
            .collect();
        topics.sort_by(|a, b| a.subject.cmp(&b.subject).then_with(|| a.name.cmp(&b.name)));
        Ok(topics)
    }
}
