use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::MemberId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::member::{CreateMemberRequest, MemberResponse, UpdateMemberRequest};

pub async fn show_member_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<MemberResponse>>> {
    let members = registry.member_repository().find_all().await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

pub async fn show_member(
    Path(member_id): Path<MemberId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MemberResponse>> {
    registry
        .member_repository()
        .find_by_id(member_id)
        .await?
        .map(MemberResponse::from)
        .map(Json)
        .ok_or_else(|| AppError::EntityNotFound("specified member not found".into()))
}

pub async fn register_member(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateMemberRequest>,
) -> AppResult<(StatusCode, Json<MemberResponse>)> {
    req.validate(&())?;
    let member = registry.member_repository().create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

pub async fn update_member(
    Path(member_id): Path<MemberId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateMemberRequest>,
) -> AppResult<Json<MemberResponse>> {
    req.validate(&())?;
    let member = registry
        .member_repository()
        .update(req.into_event(member_id))
        .await?;
    Ok(Json(member.into()))
}

pub async fn delete_member(
    Path(member_id): Path<MemberId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry.member_repository().delete(member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
