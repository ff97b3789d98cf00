use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    book::{
        event::{CreateBook, UpdateBook},
        Book, BookListFilter,
    },
    id::BookId,
};

#[mockall::automock]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(&self, event: CreateBook) -> AppResult<Book>;
    // exact-match author/genre filters; empty filter lists everything
    async fn find_all(&self, filter: BookListFilter) -> AppResult<Vec<Book>>;
    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>>;
    async fn update(&self, event: UpdateBook) -> AppResult<Book>;
    async fn delete(&self, book_id: BookId) -> AppResult<()>;
}
