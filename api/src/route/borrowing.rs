use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::borrowing::{borrow_book, return_book, show_borrowing_record_list};

pub fn build_borrowing_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/borrowing-records", get(show_borrowing_record_list))
        .route("/borrow", post(borrow_book))
        .route("/return/:record_id", put(return_book))
}
