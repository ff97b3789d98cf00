use chrono::NaiveDate;

use super::super::id::{BookId, BorrowingRecordId, MemberId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBorrowing {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReturned {
    pub record_id: BorrowingRecordId,
    pub returned_at: NaiveDate,
}
