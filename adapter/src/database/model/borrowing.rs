use chrono::NaiveDate;
use kernel::model::borrowing::BorrowingRecord;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct BorrowingRecordRow {
    pub record_id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl From<BorrowingRecordRow> for BorrowingRecord {
    fn from(row: BorrowingRecordRow) -> Self {
        BorrowingRecord {
            id: row.record_id.into(),
            book_id: row.book_id.into(),
            member_id: row.member_id.into(),
            borrow_date: row.borrow_date,
            due_date: row.due_date,
            return_date: row.return_date,
        }
    }
}
