use chrono::NaiveDate;
use shared::error::{AppError, AppResult};

pub mod book;
pub mod borrowing;
pub mod member;

// Date query parameters use the dd/MM/yyyy wire format.
pub(crate) fn parse_date_param(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y").map_err(|_| {
        AppError::UnprocessableEntity(format!("invalid date, expected dd/MM/yyyy: {value}"))
    })
}
