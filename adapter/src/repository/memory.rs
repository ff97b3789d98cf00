use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use kernel::{
    model::{
        book::{
            event::{CreateBook, UpdateBook},
            Book, BookListFilter,
        },
        borrowing::{
            event::{CreateBorrowing, UpdateReturned},
            BorrowingRecord,
        },
        id::{BookId, BorrowingRecordId, MemberId},
        member::{
            event::{CreateMember, UpdateMember},
            Member,
        },
    },
    repository::{
        book::BookRepository, borrowing::BorrowingRepository, health::HealthCheckRepository,
        member::MemberRepository,
    },
};
use shared::error::{AppError, AppResult};

#[derive(Default)]
struct LibraryState {
    books: HashMap<BookId, Book>,
    members: HashMap<MemberId, Member>,
    records: HashMap<BorrowingRecordId, BorrowingRecord>,
}

/// In-memory, HashMap-backed implementation of every repository trait.
///
/// Intended for tests and embedding. One `RwLock` guards the whole library,
/// so the compound borrow/return mutations stay atomic; entities are cloned
/// on read and write.
#[derive(Clone, Default)]
pub struct InMemoryLibrary {
    state: Arc<RwLock<LibraryState>>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryLibrary {
    async fn create(&self, event: CreateBook) -> AppResult<Book> {
        let book = Book {
            id: BookId::new(),
            title: event.title,
            author: event.author,
            publication_year: event.publication_year,
            genre: event.genre,
            total_copies: event.total_copies,
            available_copies: event.available_copies,
        };
        self.state
            .write()
            .expect("lock poisoned")
            .books
            .insert(book.id, book.clone());
        Ok(book)
    }

    async fn find_all(&self, filter: BookListFilter) -> AppResult<Vec<Book>> {
        let state = self.state.read().expect("lock poisoned");
        let mut books: Vec<Book> = state
            .books
            .values()
            .filter(|b| filter.author.as_deref().map_or(true, |a| b.author == a))
            .filter(|b| filter.genre.as_deref().map_or(true, |g| b.genre == g))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state.books.get(&book_id).cloned())
    }

    async fn update(&self, event: UpdateBook) -> AppResult<Book> {
        let mut state = self.state.write().expect("lock poisoned");
        let book = state
            .books
            .get_mut(&event.book_id)
            .ok_or_else(|| AppError::EntityNotFound("specified book not found".into()))?;
        *book = Book {
            id: event.book_id,
            title: event.title,
            author: event.author,
            publication_year: event.publication_year,
            genre: event.genre,
            total_copies: event.total_copies,
            available_copies: event.available_copies,
        };
        Ok(book.clone())
    }

    async fn delete(&self, book_id: BookId) -> AppResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        state
            .books
            .remove(&book_id)
            .map(|_| ())
            .ok_or_else(|| AppError::EntityNotFound("specified book not found".into()))
    }
}

#[async_trait]
impl MemberRepository for InMemoryLibrary {
    async fn create(&self, event: CreateMember) -> AppResult<Member> {
        let member = Member {
            id: MemberId::new(),
            name: event.name,
            email: event.email,
        };
        self.state
            .write()
            .expect("lock poisoned")
            .members
            .insert(member.id, member.clone());
        Ok(member)
    }

    async fn find_all(&self) -> AppResult<Vec<Member>> {
        let state = self.state.read().expect("lock poisoned");
        let mut members: Vec<Member> = state.members.values().cloned().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    async fn find_by_id(&self, member_id: MemberId) -> AppResult<Option<Member>> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state.members.get(&member_id).cloned())
    }

    async fn update(&self, event: UpdateMember) -> AppResult<Member> {
        let mut state = self.state.write().expect("lock poisoned");
        let member = state
            .members
            .get_mut(&event.member_id)
            .ok_or_else(|| AppError::EntityNotFound("specified member not found".into()))?;
        *member = Member {
            id: event.member_id,
            name: event.name,
            email: event.email,
        };
        Ok(member.clone())
    }

    async fn delete(&self, member_id: MemberId) -> AppResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        state
            .members
            .remove(&member_id)
            .map(|_| ())
            .ok_or_else(|| AppError::EntityNotFound("specified member not found".into()))
    }
}

#[async_trait]
impl BorrowingRepository for InMemoryLibrary {
    async fn create(&self, event: CreateBorrowing) -> AppResult<BorrowingRecord> {
        // One write lock across the whole compound step keeps the stock
        // check and the record insert atomic.
        let mut state = self.state.write().expect("lock poisoned");
        if !state.books.contains_key(&event.book_id) {
            return Err(AppError::EntityNotFound("specified book not found".into()));
        }
        if !state.members.contains_key(&event.member_id) {
            return Err(AppError::InvalidReference(format!(
                "member does not exist: {}",
                event.member_id
            )));
        }
        let book = state
            .books
            .get_mut(&event.book_id)
            .ok_or_else(|| AppError::EntityNotFound("specified book not found".into()))?;
        book.reserve_copy()?;

        let record = BorrowingRecord {
            id: BorrowingRecordId::new(),
            book_id: event.book_id,
            member_id: event.member_id,
            borrow_date: event.borrow_date,
            due_date: event.due_date,
            return_date: None,
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_returned(&self, event: UpdateReturned) -> AppResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        let record = state
            .records
            .get_mut(&event.record_id)
            .ok_or_else(|| {
                AppError::EntityNotFound("specified borrowing record not found".into())
            })?;
        if !record.is_open() {
            return Err(AppError::AlreadyReturned(event.record_id.to_string()));
        }
        record.return_date = Some(event.returned_at);
        let book_id = record.book_id;

        match state.books.get_mut(&book_id) {
            Some(book) => book.release_copy(),
            // Lenient path: the book was deleted while the loan was open.
            None => tracing::warn!(
                record_id = %event.record_id,
                book_id = %book_id,
                "book for returned record no longer exists; skipping copy increment"
            ),
        }
        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<BorrowingRecord>> {
        let state = self.state.read().expect("lock poisoned");
        let mut records: Vec<BorrowingRecord> = state.records.values().cloned().collect();
        records.sort_by_key(|r| r.borrow_date);
        Ok(records)
    }

    async fn find_open_by_book_id(&self, book_id: BookId) -> AppResult<Vec<BorrowingRecord>> {
        let state = self.state.read().expect("lock poisoned");
        let mut records: Vec<BorrowingRecord> = state
            .records
            .values()
            .filter(|r| r.book_id == book_id && r.is_open())
            .cloned()
            .collect();
        records.sort_by_key(|r| r.due_date);
        Ok(records)
    }

    async fn find_due_on(
        &self,
        due_date: NaiveDate,
        outstanding_only: bool,
    ) -> AppResult<Vec<BorrowingRecord>> {
        let state = self.state.read().expect("lock poisoned");
        let mut records: Vec<BorrowingRecord> = state
            .records
            .values()
            .filter(|r| r.due_date == due_date)
            .filter(|r| !outstanding_only || r.is_open())
            .cloned()
            .collect();
        records.sort_by_key(|r| r.borrow_date);
        Ok(records)
    }
}

#[async_trait]
impl HealthCheckRepository for InMemoryLibrary {
    async fn check_db(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use kernel::model::borrowing::default_due_date;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_book(lib: &InMemoryLibrary, copies: i32) -> Book {
        BookRepository::create(
            lib,
            CreateBook {
                title: "1984".into(),
                author: "George Orwell".into(),
                publication_year: 1949,
                genre: "Dystopian".into(),
                total_copies: copies,
                available_copies: copies,
            },
        )
        .await
        .unwrap()
    }

    async fn seed_member(lib: &InMemoryLibrary) -> Member {
        MemberRepository::create(
            lib,
            CreateMember {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        )
        .await
        .unwrap()
    }

    fn borrow_event(book: &Book, member: &Member, borrow_date: NaiveDate) -> CreateBorrowing {
        CreateBorrowing {
            book_id: book.id,
            member_id: member.id,
            borrow_date,
            due_date: default_due_date(borrow_date),
        }
    }

    #[tokio::test]
    async fn borrow_opens_record_and_decrements_stock() {
        let lib = InMemoryLibrary::new();
        let book = seed_book(&lib, 2).await;
        let member = seed_member(&lib).await;

        let record = BorrowingRepository::create(
            &lib,
            borrow_event(&book, &member, date(2024, 4, 17)),
        )
        .await
        .unwrap();

        assert!(record.is_open());
        assert_eq!(record.due_date, date(2024, 5, 1));
        let book = BookRepository::find_by_id(&lib, book.id).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 1);
    }

    #[tokio::test]
    async fn borrow_requires_existing_member() {
        let lib = InMemoryLibrary::new();
        let book = seed_book(&lib, 1).await;
        let ghost = Member {
            id: MemberId::new(),
            name: "Ghost".into(),
            email: "ghost@example.com".into(),
        };

        let err = BorrowingRepository::create(
            &lib,
            borrow_event(&book, &ghost, date(2024, 4, 17)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn last_copy_cannot_be_borrowed_twice() {
        let lib = InMemoryLibrary::new();
        let book = seed_book(&lib, 1).await;
        let member = seed_member(&lib).await;

        BorrowingRepository::create(&lib, borrow_event(&book, &member, date(2024, 4, 17)))
            .await
            .unwrap();
        let err =
            BorrowingRepository::create(&lib, borrow_event(&book, &member, date(2024, 4, 18)))
                .await
                .unwrap_err();
        assert!(matches!(err, AppError::NoCopiesAvailable(_)));
    }

    #[tokio::test]
    async fn concurrent_borrows_of_last_copy_serialize() {
        let lib = InMemoryLibrary::new();
        let book = seed_book(&lib, 1).await;
        let member = seed_member(&lib).await;

        let (a, b) = tokio::join!(
            BorrowingRepository::create(&lib, borrow_event(&book, &member, date(2024, 4, 17))),
            BorrowingRepository::create(&lib, borrow_event(&book, &member, date(2024, 4, 17))),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let book = BookRepository::find_by_id(&lib, book.id).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 0);
    }

    #[tokio::test]
    async fn return_closes_record_once_and_restores_stock() {
        let lib = InMemoryLibrary::new();
        let book = seed_book(&lib, 1).await;
        let member = seed_member(&lib).await;
        let record =
            BorrowingRepository::create(&lib, borrow_event(&book, &member, date(2024, 4, 17)))
                .await
                .unwrap();

        let returned = UpdateReturned {
            record_id: record.id,
            returned_at: date(2024, 4, 20),
        };
        BorrowingRepository::update_returned(&lib, returned)
            .await
            .unwrap();

        let book = BookRepository::find_by_id(&lib, book.id).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 1);
        let records = BorrowingRepository::find_all(&lib).await.unwrap();
        assert_eq!(records[0].return_date, Some(date(2024, 4, 20)));

        // Returned -> Returned is illegal; stock must not double-count.
        let err = BorrowingRepository::update_returned(&lib, returned)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyReturned(_)));
        let book = BookRepository::find_by_id(&lib, book.id).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 1);
    }

    #[tokio::test]
    async fn return_after_book_deletion_still_closes_record() {
        let lib = InMemoryLibrary::new();
        let book = seed_book(&lib, 1).await;
        let member = seed_member(&lib).await;
        let record =
            BorrowingRepository::create(&lib, borrow_event(&book, &member, date(2024, 4, 17)))
                .await
                .unwrap();

        BookRepository::delete(&lib, book.id).await.unwrap();
        BorrowingRepository::update_returned(
            &lib,
            UpdateReturned {
                record_id: record.id,
                returned_at: date(2024, 4, 20),
            },
        )
        .await
        .unwrap();

        let records = BorrowingRepository::find_all(&lib).await.unwrap();
        assert!(!records[0].is_open());
    }

    #[tokio::test]
    async fn due_on_date_distinguishes_outstanding_loans() {
        let lib = InMemoryLibrary::new();
        let book = seed_book(&lib, 2).await;
        let member = seed_member(&lib).await;
        let borrow_date = date(2024, 4, 17);

        let open =
            BorrowingRepository::create(&lib, borrow_event(&book, &member, borrow_date))
                .await
                .unwrap();
        let closed =
            BorrowingRepository::create(&lib, borrow_event(&book, &member, borrow_date))
                .await
                .unwrap();
        BorrowingRepository::update_returned(
            &lib,
            UpdateReturned {
                record_id: closed.id,
                returned_at: date(2024, 4, 19),
            },
        )
        .await
        .unwrap();

        let due = default_due_date(borrow_date);
        let all = BorrowingRepository::find_due_on(&lib, due, false).await.unwrap();
        assert_eq!(all.len(), 2);
        let outstanding = BorrowingRepository::find_due_on(&lib, due, true).await.unwrap();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].id, open.id);
    }

    #[tokio::test]
    async fn author_and_genre_filters_are_conjunctive() {
        let lib = InMemoryLibrary::new();
        for (title, author, genre) in [
            ("1984", "George Orwell", "Dystopian"),
            ("Animal Farm", "George Orwell", "Satire"),
            ("Brave New World", "Aldous Huxley", "Dystopian"),
        ] {
            BookRepository::create(
                &lib,
                CreateBook {
                    title: title.into(),
                    author: author.into(),
                    publication_year: 1949,
                    genre: genre.into(),
                    total_copies: 1,
                    available_copies: 1,
                },
            )
            .await
            .unwrap();
        }

        let by_author = BookRepository::find_all(
            &lib,
            BookListFilter {
                author: Some("George Orwell".into()),
                genre: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(by_author.len(), 2);

        let both = BookRepository::find_all(
            &lib,
            BookListFilter {
                author: Some("George Orwell".into()),
                genre: Some("Dystopian".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].title, "1984");
    }
}
