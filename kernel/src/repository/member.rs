use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::MemberId,
    member::{
        event::{CreateMember, UpdateMember},
        Member,
    },
};

#[mockall::automock]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, event: CreateMember) -> AppResult<Member>;
    async fn find_all(&self) -> AppResult<Vec<Member>>;
    async fn find_by_id(&self, member_id: MemberId) -> AppResult<Option<Member>>;
    async fn update(&self, event: UpdateMember) -> AppResult<Member>;
    async fn delete(&self, member_id: MemberId) -> AppResult<()>;
}
