//! Study sources and curriculum topics.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewSource, Source, Topic, UserId};

#[async_trait]
pub trait SourceRepository: Send + Sync {
    async fn insert_source(&self, source: &NewSource) -> RepositoryResult<Source>;

    /// Sources of a user, ordered by subject then name.
    async fn list_sources(&self, user_id: UserId) -> RepositoryResult<Vec<Source>>;
}

/// Read-only curriculum catalog.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Topics ordered by subject then name, optionally restricted to one
    /// subject (case-insensitive).
    async fn list_topics(&self, subject: Option<&str>) -> RepositoryResult<Vec<Topic>>;
}
