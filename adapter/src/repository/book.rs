use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        book::{
            event::{CreateBook, UpdateBook},
            Book, BookListFilter,
        },
        id::BookId,
    },
    repository::book::BookRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::book::BookRow, ConnectionPool};

#[derive(new)]
pub struct BookRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn create(&self, event: CreateBook) -> AppResult<Book> {
        let book = Book {
            id: BookId::new(),
            title: event.title,
            author: event.author,
            publication_year: event.publication_year,
            genre: event.genre,
            total_copies: event.total_copies,
            available_copies: event.available_copies,
        };
        sqlx::query(
            "INSERT INTO books \
             (book_id, title, author, publication_year, genre, total_copies, available_copies) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(book.id.raw())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.publication_year)
        .bind(&book.genre)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(book)
    }

    async fn find_all(&self, filter: BookListFilter) -> AppResult<Vec<Book>> {
        let rows = match (filter.author, filter.genre) {
            (Some(author), Some(genre)) => {
                sqlx::query_as::<_, BookRow>(
                    "SELECT book_id, title, author, publication_year, genre, \
                     total_copies, available_copies \
                     FROM books WHERE author = $1 AND genre = $2 ORDER BY title",
                )
                .bind(author)
                .bind(genre)
                .fetch_all(self.db.inner_ref())
                .await
            }
            (Some(author), None) => {
                sqlx::query_as::<_, BookRow>(
                    "SELECT book_id, title, author, publication_year, genre, \
                     total_copies, available_copies \
                     FROM books WHERE author = $1 ORDER BY title",
                )
                .bind(author)
                .fetch_all(self.db.inner_ref())
                .await
            }
            (None, Some(genre)) => {
                sqlx::query_as::<_, BookRow>(
                    "SELECT book_id, title, author, publication_year, genre, \
                     total_copies, available_copies \
                     FROM books WHERE genre = $1 ORDER BY title",
                )
                .bind(genre)
                .fetch_all(self.db.inner_ref())
                .await
            }
            (None, None) => {
                sqlx::query_as::<_, BookRow>(
                    "SELECT book_id, title, author, publication_year, genre, \
                     total_copies, available_copies \
                     FROM books ORDER BY title",
                )
                .fetch_all(self.db.inner_ref())
                .await
            }
        }
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT book_id, title, author, publication_year, genre, \
             total_copies, available_copies \
             FROM books WHERE book_id = $1",
        )
        .bind(book_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(row.map(Book::from))
    }

    async fn update(&self, event: UpdateBook) -> AppResult<Book> {
        let res = sqlx::query(
            "UPDATE books SET \
             title = $2, author = $3, publication_year = $4, genre = $5, \
             total_copies = $6, available_copies = $7 \
             WHERE book_id = $1",
        )
        .bind(event.book_id.raw())
        .bind(&event.title)
        .bind(&event.author)
        .bind(event.publication_year)
        .bind(&event.genre)
        .bind(event.total_copies)
        .bind(event.available_copies)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified book not found".into()));
        }
        Ok(Book {
            id: event.book_id,
            title: event.title,
            author: event.author,
            publication_year: event.publication_year,
            genre: event.genre,
            total_copies: event.total_copies,
            available_copies: event.available_copies,
        })
    }

    async fn delete(&self, book_id: BookId) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified book not found".into()));
        }
        Ok(())
    }
}
