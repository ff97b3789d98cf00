use chrono::{Duration, NaiveDate};

use super::{
    book::Book,
    id::{BookId, BorrowingRecordId, MemberId},
};

pub mod event;

/// Fixed loan period added to the borrow date to compute the default due
/// date.
// TODO: make the loan period configurable per library policy.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// One borrow transaction. `return_date == None` is the sole signal of an
/// open loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowingRecord {
    pub id: BorrowingRecordId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl BorrowingRecord {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

pub fn default_due_date(borrow_date: NaiveDate) -> NaiveDate {
    borrow_date + Duration::days(LOAN_PERIOD_DAYS)
}

/// Earliest date a copy of `book` is expected to be borrowable.
///
/// A stocked book is available today. Otherwise the earliest due date among
/// the open loans is the prediction. `None` means the stock counter and the
/// loan records disagree, so no prediction can be made; callers must treat
/// the absence of a date as "cannot predict", not as an error.
pub fn earliest_available_date(
    book: &Book,
    open_loans: &[BorrowingRecord],
    today: NaiveDate,
) -> Option<NaiveDate> {
    if book.is_available() {
        return Some(today);
    }
    open_loans
        .iter()
        .filter(|record| record.is_open())
        .map(|record| record.due_date)
        .min()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::model::id::{BookId, BorrowingRecordId, MemberId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book(available: i32) -> Book {
        Book {
            id: BookId::new(),
            title: "Animal Farm".into(),
            author: "George Orwell".into(),
            publication_year: 1945,
            genre: "Satire".into(),
            total_copies: 3,
            available_copies: available,
        }
    }

    fn loan(due: NaiveDate, returned: Option<NaiveDate>) -> BorrowingRecord {
        BorrowingRecord {
            id: BorrowingRecordId::new(),
            book_id: BookId::new(),
            member_id: MemberId::new(),
            borrow_date: due - Duration::days(LOAN_PERIOD_DAYS),
            due_date: due,
            return_date: returned,
        }
    }

    #[test]
    fn due_date_is_two_weeks_out() {
        assert_eq!(default_due_date(date(2024, 4, 17)), date(2024, 5, 1));
    }

    #[test]
    fn stocked_book_is_available_today() {
        let today = date(2024, 4, 20);
        let loans = [loan(date(2024, 5, 1), None)];
        assert_eq!(
            earliest_available_date(&book(1), &loans, today),
            Some(today)
        );
    }

    #[rstest]
    #[case::single_loan(vec![date(2024, 5, 1)], Some(date(2024, 5, 1)))]
    #[case::earliest_wins(
        vec![date(2024, 5, 9), date(2024, 5, 1), date(2024, 5, 4)],
        Some(date(2024, 5, 1))
    )]
    #[case::no_open_loans(vec![], None)]
    fn exhausted_book_predicts_earliest_due_date(
        #[case] due_dates: Vec<NaiveDate>,
        #[case] expected: Option<NaiveDate>,
    ) {
        let loans: Vec<_> = due_dates.into_iter().map(|d| loan(d, None)).collect();
        let today = date(2024, 4, 20);
        assert_eq!(earliest_available_date(&book(0), &loans, today), expected);
    }

    #[test]
    fn closed_loans_do_not_count() {
        let today = date(2024, 4, 20);
        let loans = [
            loan(date(2024, 4, 25), Some(date(2024, 4, 19))),
            loan(date(2024, 5, 1), None),
        ];
        assert_eq!(
            earliest_available_date(&book(0), &loans, today),
            Some(date(2024, 5, 1))
        );
    }
}
