use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    book::BookListFilter, borrowing::earliest_available_date, id::BookId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::{
    book::{
        AvailableDateQuery, AvailableDateResponse, BookListQuery, BookResponse,
        CreateBookRequest, GenreQuery, UpdateBookRequest,
    },
    borrowing::DueOnDateQuery,
    parse_date_param,
};

/// Collection listing with optional exact-match author/genre filters.
pub async fn show_book_list(
    Query(query): Query<BookListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let filter = BookListFilter {
        author: query.author,
        genre: query.genre,
    };
    let books = registry.book_repository().find_all(filter).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Genre filter as its own endpoint; an absent genre lists everything.
pub async fn show_book_list_by_genre(
    Query(query): Query<GenreQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let filter = BookListFilter {
        author: None,
        genre: query.genre,
    };
    let books = registry.book_repository().find_all(filter).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

pub async fn show_book_list_by_author(
    Path(author): Path<String>,
    Query(query): Query<GenreQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let filter = BookListFilter {
        author: Some(author),
        genre: query.genre,
    };
    let books = registry.book_repository().find_all(filter).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Books whose loans fall due on the given date, resolved from the records;
/// records pointing at a deleted book are skipped.
pub async fn show_book_list_due_on(
    Query(query): Query<DueOnDateQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let due_date = parse_date_param(&query.due_date)?;
    let records = registry
        .borrowing_repository()
        .find_due_on(due_date, query.outstanding_only)
        .await?;

    let book_repository = registry.book_repository();
    let mut books = Vec::with_capacity(records.len());
    for record in records {
        if let Some(book) = book_repository.find_by_id(record.book_id).await? {
            books.push(BookResponse::from(book));
        }
    }
    Ok(Json(books))
}

/// Earliest date a copy of the book is expected to be borrowable.
pub async fn show_available_date(
    Query(query): Query<AvailableDateQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailableDateResponse>> {
    let book = registry
        .book_repository()
        .find_by_id(query.book_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("specified book not found".into()))?;
    let open_loans = registry
        .borrowing_repository()
        .find_open_by_book_id(book.id)
        .await?;

    let today = Utc::now().date_naive();
    let available_date = earliest_available_date(&book, &open_loans, today);
    if available_date.is_none() {
        tracing::warn!(
            book_id = %book.id,
            "zero copies but no open loans; availability cannot be predicted"
        );
    }
    Ok(Json(AvailableDateResponse { available_date }))
}

pub async fn show_book(
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookResponse>> {
    registry
        .book_repository()
        .find_by_id(book_id)
        .await?
        .map(BookResponse::from)
        .map(Json)
        .ok_or_else(|| AppError::EntityNotFound("specified book not found".into()))
}

pub async fn register_book(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    req.validate(&())?;
    let book = registry.book_repository().create(req.into_event()?).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

pub async fn update_book(
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookRequest>,
) -> AppResult<Json<BookResponse>> {
    req.validate(&())?;
    let book = registry
        .book_repository()
        .update(req.into_event(book_id)?)
        .await?;
    Ok(Json(book.into()))
}

pub async fn delete_book(
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry.book_repository().delete(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
