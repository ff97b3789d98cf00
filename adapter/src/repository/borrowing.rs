use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use kernel::{
    model::{
        book::Book,
        borrowing::{
            event::{CreateBorrowing, UpdateReturned},
            BorrowingRecord,
        },
        id::{BookId, BorrowingRecordId},
    },
    repository::borrowing::BorrowingRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{book::BookRow, borrowing::BorrowingRecordRow},
    ConnectionPool,
};

const SELECT_BOOK_FOR_UPDATE: &str = "SELECT book_id, title, author, publication_year, genre, \
     total_copies, available_copies \
     FROM books WHERE book_id = $1 FOR UPDATE";

#[derive(new)]
pub struct BorrowingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BorrowingRepository for BorrowingRepositoryImpl {
    async fn create(&self, event: CreateBorrowing) -> AppResult<BorrowingRecord> {
        let mut tx = self.db.begin().await?;

        // Lock the book row so concurrent borrows of the last copy
        // serialize; the stock check below runs under this lock.
        let book_row = sqlx::query_as::<_, BookRow>(SELECT_BOOK_FOR_UPDATE)
            .bind(event.book_id.raw())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        let mut book = book_row
            .map(Book::from)
            .ok_or_else(|| AppError::EntityNotFound("specified book not found".into()))?;

        let member_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM members WHERE member_id = $1)")
                .bind(event.member_id.raw())
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if !member_exists {
            return Err(AppError::InvalidReference(format!(
                "member does not exist: {}",
                event.member_id
            )));
        }

        book.reserve_copy()?;

        let record = BorrowingRecord {
            id: BorrowingRecordId::new(),
            book_id: event.book_id,
            member_id: event.member_id,
            borrow_date: event.borrow_date,
            due_date: event.due_date,
            return_date: None,
        };
        sqlx::query(
            "INSERT INTO borrowing_records \
             (record_id, book_id, member_id, borrow_date, due_date, return_date) \
             VALUES ($1, $2, $3, $4, $5, NULL)",
        )
        .bind(record.id.raw())
        .bind(record.book_id.raw())
        .bind(record.member_id.raw())
        .bind(record.borrow_date)
        .bind(record.due_date)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("UPDATE books SET available_copies = $2 WHERE book_id = $1")
            .bind(book.id.raw())
            .bind(book.available_copies)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no book stock was updated on borrow".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            record_id = %record.id,
            book_id = %record.book_id,
            member_id = %record.member_id,
            due_date = %record.due_date,
            "book borrowed"
        );
        Ok(record)
    }

    async fn update_returned(&self, event: UpdateReturned) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, BorrowingRecordRow>(
            "SELECT record_id, book_id, member_id, borrow_date, due_date, return_date \
             FROM borrowing_records WHERE record_id = $1 FOR UPDATE",
        )
        .bind(event.record_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        let record = row.map(BorrowingRecord::from).ok_or_else(|| {
            AppError::EntityNotFound("specified borrowing record not found".into())
        })?;
        if !record.is_open() {
            return Err(AppError::AlreadyReturned(event.record_id.to_string()));
        }

        sqlx::query("UPDATE borrowing_records SET return_date = $2 WHERE record_id = $1")
            .bind(event.record_id.raw())
            .bind(event.returned_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let book_row = sqlx::query_as::<_, BookRow>(SELECT_BOOK_FOR_UPDATE)
            .bind(record.book_id.raw())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        match book_row.map(Book::from) {
            Some(mut book) => {
                book.release_copy();
                sqlx::query("UPDATE books SET available_copies = $2 WHERE book_id = $1")
                    .bind(book.id.raw())
                    .bind(book.available_copies)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;
            }
            // The book may have been deleted while the loan was open. The
            // record is still closed; only the stock increment is skipped.
            None => {
                tracing::warn!(
                    record_id = %event.record_id,
                    book_id = %record.book_id,
                    "book for returned record no longer exists; skipping copy increment"
                );
            }
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<BorrowingRecord>> {
        let rows = sqlx::query_as::<_, BorrowingRecordRow>(
            "SELECT record_id, book_id, member_id, borrow_date, due_date, return_date \
             FROM borrowing_records ORDER BY borrow_date",
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(BorrowingRecord::from).collect())
    }

    async fn find_open_by_book_id(&self, book_id: BookId) -> AppResult<Vec<BorrowingRecord>> {
        let rows = sqlx::query_as::<_, BorrowingRecordRow>(
            "SELECT record_id, book_id, member_id, borrow_date, due_date, return_date \
             FROM borrowing_records \
             WHERE book_id = $1 AND return_date IS NULL ORDER BY due_date",
        )
        .bind(book_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(BorrowingRecord::from).collect())
    }

    async fn find_due_on(
        &self,
        due_date: NaiveDate,
        outstanding_only: bool,
    ) -> AppResult<Vec<BorrowingRecord>> {
        let rows = if outstanding_only {
            sqlx::query_as::<_, BorrowingRecordRow>(
                "SELECT record_id, book_id, member_id, borrow_date, due_date, return_date \
                 FROM borrowing_records \
                 WHERE due_date = $1 AND return_date IS NULL ORDER BY borrow_date",
            )
            .bind(due_date)
            .fetch_all(self.db.inner_ref())
            .await
        } else {
            sqlx::query_as::<_, BorrowingRecordRow>(
                "SELECT record_id, book_id, member_id, borrow_date, due_date, return_date \
                 FROM borrowing_records WHERE due_date = $1 ORDER BY borrow_date",
            )
            .bind(due_date)
            .fetch_all(self.db.inner_ref())
            .await
        }
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(BorrowingRecord::from).collect())
    }
}
