//! Study and reading record persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{
    NewReadingRecord, NewStudyRecord, ReadingRecord, StudyRecord, StudyRecordId, UserId,
};

#[async_trait]
pub trait RecordRepository: Send + Sync {
    // ==================== Study Records ====================

    /// Store a study session. The record is validated before it is stored.
    async fn insert_study_record(&self, record: &NewStudyRecord) -> RepositoryResult<StudyRecord>;

    /// Study records of a user, ordered by date then id.
    ///
    /// # Arguments
    /// * `user_id` - Owner of the records
    /// * `from` - Inclusive lower date bound, if any
    /// * `to` - Inclusive upper date bound, if any
    async fn list_study_records(
        &self,
        user_id: UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<StudyRecord>>;

    async fn get_study_record(&self, record_id: StudyRecordId) -> RepositoryResult<StudyRecord>;

    /// Delete a study record.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no record has this id
    async fn delete_study_record(&self, record_id: StudyRecordId) -> RepositoryResult<()>;

    // ==================== Reading Records ====================

    async fn insert_reading_record(
        &self,
        record: &NewReadingRecord,
    ) -> RepositoryResult<ReadingRecord>;

    /// Reading records of a user, ordered by date then id.
    async fn list_reading_records(&self, user_id: UserId) -> RepositoryResult<Vec<ReadingRecord>>;
}
