use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    book::{
        event::{CreateBook, UpdateBook},
        Book,
    },
    id::BookId,
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub author: String,
    #[garde(range(min = 0))]
    pub publication_year: i32,
    #[garde(length(min = 1))]
    pub genre: String,
    #[garde(range(min = 1))]
    pub total_copies: i32,
    // defaults to totalCopies when omitted
    #[garde(skip)]
    pub available_copies: Option<i32>,
}

impl CreateBookRequest {
    pub fn into_event(self) -> AppResult<CreateBook> {
        let available_copies = self.available_copies.unwrap_or(self.total_copies);
        if !(0..=self.total_copies).contains(&available_copies) {
            return Err(AppError::UnprocessableEntity(
                "availableCopies must be between 0 and totalCopies".into(),
            ));
        }
        Ok(CreateBook {
            title: self.title,
            author: self.author,
            publication_year: self.publication_year,
            genre: self.genre,
            total_copies: self.total_copies,
            available_copies,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub author: String,
    #[garde(range(min = 0))]
    pub publication_year: i32,
    #[garde(length(min = 1))]
    pub genre: String,
    #[garde(range(min = 1))]
    pub total_copies: i32,
    #[garde(range(min = 0))]
    pub available_copies: i32,
}

impl UpdateBookRequest {
    pub fn into_event(self, book_id: BookId) -> AppResult<UpdateBook> {
        if self.available_copies > self.total_copies {
            return Err(AppError::UnprocessableEntity(
                "availableCopies must not exceed totalCopies".into(),
            ));
        }
        Ok(UpdateBook {
            book_id,
            title: self.title,
            author: self.author,
            publication_year: self.publication_year,
            genre: self.genre,
            total_copies: self.total_copies,
            available_copies: self.available_copies,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            publication_year: book.publication_year,
            genre: book.genre,
            total_copies: book.total_copies,
            available_copies: book.available_copies,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookListQuery {
    pub author: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDateQuery {
    pub book_id: BookId,
}

// `availableDate: null` means the stock counter and the loan records
// disagree and no prediction can be made.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDateResponse {
    pub available_date: Option<NaiveDate>,
}
