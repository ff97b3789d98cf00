use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

use crate::model::{
    borrowing::{
        event::{CreateBorrowing, UpdateReturned},
        BorrowingRecord,
    },
    id::BookId,
};

#[mockall::automock]
#[async_trait]
pub trait BorrowingRepository: Send + Sync {
    // borrow operation: validates book/member/stock and opens a record,
    // atomically with the copy-count decrement
    async fn create(&self, event: CreateBorrowing) -> AppResult<BorrowingRecord>;
    // return operation: Open -> Returned exactly once, atomically with the
    // clamped copy-count increment
    async fn update_returned(&self, event: UpdateReturned) -> AppResult<()>;
    // every record, open and closed
    async fn find_all(&self) -> AppResult<Vec<BorrowingRecord>>;
    // open loans for one book
    async fn find_open_by_book_id(&self, book_id: BookId) -> AppResult<Vec<BorrowingRecord>>;
    // records due on a given date; optionally only those still outstanding
    async fn find_due_on(
        &self,
        due_date: NaiveDate,
        outstanding_only: bool,
    ) -> AppResult<Vec<BorrowingRecord>>;
}
