//! Book persistence.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Book, BookId, NewBook, UserId};

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn insert_book(&self, book: &NewBook) -> RepositoryResult<Book>;

    /// Books of a user, ordered by id.
    async fn list_books(&self, user_id: UserId) -> RepositoryResult<Vec<Book>>;

    async fn get_book(&self, book_id: BookId) -> RepositoryResult<Book>;
}
