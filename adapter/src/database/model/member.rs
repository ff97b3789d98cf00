use kernel::model::member::Member;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct MemberRow {
    pub member_id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: row.member_id.into(),
            name: row.name,
            email: row.email,
        }
    }
}
