use axum::{extract::State, http::StatusCode};
use registry::AppRegistry;

pub async fn index() -> &'static str {
    "Library API root. Use /api/..."
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub async fn health_check_db(State(registry): State<AppRegistry>) -> StatusCode {
    if registry.health_check_repository().check_db().await {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
