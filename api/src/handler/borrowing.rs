use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use kernel::model::{borrowing::event::UpdateReturned, id::BorrowingRecordId};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::{
    borrowing::{BorrowRequest, BorrowingRecordResponse, ReturnQuery},
    parse_date_param,
};

pub async fn show_borrowing_record_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BorrowingRecordResponse>>> {
    let records = registry.borrowing_repository().find_all().await?;
    Ok(Json(
        records
            .into_iter()
            .map(BorrowingRecordResponse::from)
            .collect(),
    ))
}

pub async fn borrow_book(
    State(registry): State<AppRegistry>,
    Json(req): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowingRecordResponse>)> {
    let today = Utc::now().date_naive();
    let record = registry
        .borrowing_repository()
        .create(req.into_event(today))
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn return_book(
    Path(record_id): Path<BorrowingRecordId>,
    Query(query): Query<ReturnQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let returned_at = match query.return_date.as_deref() {
        Some(raw) => parse_date_param(raw)?,
        None => Utc::now().date_naive(),
    };
    registry
        .borrowing_repository()
        .update_returned(UpdateReturned {
            record_id,
            returned_at,
        })
        .await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use kernel::{
        model::{
            borrowing::BorrowingRecord,
            id::{BookId, BorrowingRecordId, MemberId},
        },
        repository::{
            book::MockBookRepository, borrowing::MockBorrowingRepository,
            health::MockHealthCheckRepository, member::MockMemberRepository,
        },
    };
    use registry::AppRegistry;
    use shared::error::AppError;
    use tower::ServiceExt;

    fn app(borrowing: MockBorrowingRepository) -> Router {
        let registry = AppRegistry::with_repositories(
            Arc::new(MockBookRepository::new()),
            Arc::new(MockMemberRepository::new()),
            Arc::new(borrowing),
            Arc::new(MockHealthCheckRepository::new()),
        );
        crate::route::build_app_router().with_state(registry)
    }

    #[tokio::test]
    async fn borrow_creates_record_with_default_loan_period() {
        let mut borrowing_repo = MockBorrowingRepository::new();
        borrowing_repo.expect_create().returning(|event| {
            Ok(BorrowingRecord {
                id: BorrowingRecordId::new(),
                book_id: event.book_id,
                member_id: event.member_id,
                borrow_date: event.borrow_date,
                due_date: event.due_date,
                return_date: None,
            })
        });

        let response = app(borrowing_repo)
            .oneshot(
                Request::post("/api/borrow")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "bookId": BookId::new(),
                            "memberId": MemberId::new(),
                            "borrowDate": "2024-04-17"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["borrowDate"], "2024-04-17");
        assert_eq!(body["dueDate"], "2024-05-01");
        assert_eq!(body["returnDate"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn borrow_without_stock_conflicts() {
        let mut borrowing_repo = MockBorrowingRepository::new();
        borrowing_repo
            .expect_create()
            .returning(|event| Err(AppError::NoCopiesAvailable(event.book_id.to_string())));

        let response = app(borrowing_repo)
            .oneshot(
                Request::post("/api/borrow")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "bookId": BookId::new(),
                            "memberId": MemberId::new()
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn borrow_of_unknown_member_is_bad_request() {
        let mut borrowing_repo = MockBorrowingRepository::new();
        borrowing_repo.expect_create().returning(|event| {
            Err(AppError::InvalidReference(format!(
                "member does not exist: {}",
                event.member_id
            )))
        });

        let response = app(borrowing_repo)
            .oneshot(
                Request::post("/api/borrow")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "bookId": BookId::new(),
                            "memberId": MemberId::new()
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn return_accepts_explicit_date_parameter() {
        let mut borrowing_repo = MockBorrowingRepository::new();
        borrowing_repo
            .expect_update_returned()
            .withf(|event| {
                event.returned_at == chrono::NaiveDate::from_ymd_opt(2024, 4, 20).unwrap()
            })
            .returning(|_| Ok(()));

        let response = app(borrowing_repo)
            .oneshot(
                Request::put(format!(
                    "/api/return/{}?returnDate=20/04/2024",
                    BorrowingRecordId::new()
                ))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn double_return_conflicts() {
        let mut borrowing_repo = MockBorrowingRepository::new();
        borrowing_repo
            .expect_update_returned()
            .returning(|event| Err(AppError::AlreadyReturned(event.record_id.to_string())));

        let response = app(borrowing_repo)
            .oneshot(
                Request::put(format!("/api/return/{}", BorrowingRecordId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn return_of_unknown_record_is_not_found() {
        let mut borrowing_repo = MockBorrowingRepository::new();
        borrowing_repo.expect_update_returned().returning(|_| {
            Err(AppError::EntityNotFound(
                "specified borrowing record not found".into(),
            ))
        });

        let response = app(borrowing_repo)
            .oneshot(
                Request::put(format!("/api/return/{}", BorrowingRecordId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
