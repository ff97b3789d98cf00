use chrono::NaiveDate;
use kernel::model::{
    borrowing::{default_due_date, event::CreateBorrowing, BorrowingRecord},
    id::{BookId, BorrowingRecordId, MemberId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub book_id: BookId,
    pub member_id: MemberId,
    // both optional: the server fills in the transaction date and the
    // fixed loan period when absent
    pub borrow_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

impl BorrowRequest {
    pub fn into_event(self, today: NaiveDate) -> CreateBorrowing {
        let borrow_date = self.borrow_date.unwrap_or(today);
        let due_date = self.due_date.unwrap_or_else(|| default_due_date(borrow_date));
        CreateBorrowing {
            book_id: self.book_id,
            member_id: self.member_id,
            borrow_date,
            due_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingRecordResponse {
    pub id: BorrowingRecordId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl From<BorrowingRecord> for BorrowingRecordResponse {
    fn from(record: BorrowingRecord) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            member_id: record.member_id,
            borrow_date: record.borrow_date,
            due_date: record.due_date,
            return_date: record.return_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueOnDateQuery {
    // dd/MM/yyyy
    pub due_date: String,
    // false matches the historical behavior: closed loans count too
    #[serde(default)]
    pub outstanding_only: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnQuery {
    // dd/MM/yyyy; defaults to today
    pub return_date: Option<String>,
}
