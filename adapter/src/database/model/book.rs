use kernel::model::book::Book;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct BookRow {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.book_id.into(),
            title: row.title,
            author: row.author,
            publication_year: row.publication_year,
            genre: row.genre,
            total_copies: row.total_copies,
            available_copies: row.available_copies,
        }
    }
}
