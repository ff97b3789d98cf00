use super::super::id::BookId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub total_copies: i32,
    pub available_copies: i32,
}
