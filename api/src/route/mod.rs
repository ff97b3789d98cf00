use axum::Router;
use registry::AppRegistry;

pub mod book;
pub mod borrowing;
pub mod health;
pub mod member;

/// The whole HTTP surface: root/health probes plus everything under `/api`.
pub fn build_app_router() -> Router<AppRegistry> {
    Router::new()
        .merge(health::build_health_check_routers())
        .nest(
            "/api",
            book::build_book_routers()
                .merge(member::build_member_routers())
                .merge(borrowing::build_borrowing_routers()),
        )
}
