use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::MemberId,
        member::{
            event::{CreateMember, UpdateMember},
            Member,
        },
    },
    repository::member::MemberRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::member::MemberRow, ConnectionPool};

#[derive(new)]
pub struct MemberRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl MemberRepository for MemberRepositoryImpl {
    async fn create(&self, event: CreateMember) -> AppResult<Member> {
        let member = Member {
            id: MemberId::new(),
            name: event.name,
            email: event.email,
        };
        sqlx::query("INSERT INTO members (member_id, name, email) VALUES ($1, $2, $3)")
            .bind(member.id.raw())
            .bind(&member.name)
            .bind(&member.email)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(member)
    }

    async fn find_all(&self) -> AppResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT member_id, name, email FROM members ORDER BY name",
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_id(&self, member_id: MemberId) -> AppResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT member_id, name, email FROM members WHERE member_id = $1",
        )
        .bind(member_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;
        Ok(row.map(Member::from))
    }

    async fn update(&self, event: UpdateMember) -> AppResult<Member> {
        let res = sqlx::query("UPDATE members SET name = $2, email = $3 WHERE member_id = $1")
            .bind(event.member_id.raw())
            .bind(&event.name)
            .bind(&event.email)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified member not found".into(),
            ));
        }
        Ok(Member {
            id: event.member_id,
            name: event.name,
            email: event.email,
        })
    }

    async fn delete(&self, member_id: MemberId) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM members WHERE member_id = $1")
            .bind(member_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified member not found".into(),
            ));
        }
        Ok(())
    }
}
