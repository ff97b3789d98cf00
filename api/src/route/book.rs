use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::book::{
    delete_book, register_book, show_available_date, show_book, show_book_list,
    show_book_list_by_author, show_book_list_by_genre, show_book_list_due_on, update_book,
};

pub fn build_book_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/", get(show_book_list).post(register_book))
        .route("/genre", get(show_book_list_by_genre))
        .route("/author/:author", get(show_book_list_by_author))
        .route("/dueondate", get(show_book_list_due_on))
        .route(
            "/:book_id",
            get(show_book).put(update_book).delete(delete_book),
        );

    Router::new()
        .nest("/books", routers)
        // endpoint name kept verbatim from the original HTTP surface
        .route("/bookavailabileDate", get(show_available_date))
}
