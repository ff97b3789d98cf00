use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    repository::{
        book::BookRepositoryImpl, borrowing::BorrowingRepositoryImpl,
        health::HealthCheckRepositoryImpl, member::MemberRepositoryImpl,
    },
};
use kernel::repository::{
    book::BookRepository, borrowing::BorrowingRepository, health::HealthCheckRepository,
    member::MemberRepository,
};

/// DI container handed to every handler as axum state.
#[derive(Clone)]
pub struct AppRegistry {
    book_repository: Arc<dyn BookRepository>,
    member_repository: Arc<dyn MemberRepository>,
    borrowing_repository: Arc<dyn BorrowingRepository>,
    health_check_repository: Arc<dyn HealthCheckRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        Self::with_repositories(
            Arc::new(BookRepositoryImpl::new(pool.clone())),
            Arc::new(MemberRepositoryImpl::new(pool.clone())),
            Arc::new(BorrowingRepositoryImpl::new(pool.clone())),
            Arc::new(HealthCheckRepositoryImpl::new(pool)),
        )
    }

    // Tests wire mocks or the in-memory store through here.
    pub fn with_repositories(
        book_repository: Arc<dyn BookRepository>,
        member_repository: Arc<dyn MemberRepository>,
        borrowing_repository: Arc<dyn BorrowingRepository>,
        health_check_repository: Arc<dyn HealthCheckRepository>,
    ) -> Self {
        Self {
            book_repository,
            member_repository,
            borrowing_repository,
            health_check_repository,
        }
    }

    pub fn book_repository(&self) -> Arc<dyn BookRepository> {
        self.book_repository.clone()
    }

    pub fn member_repository(&self) -> Arc<dyn MemberRepository> {
        self.member_repository.clone()
    }

    pub fn borrowing_repository(&self) -> Arc<dyn BorrowingRepository> {
        self.borrowing_repository.clone()
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }
}
