use super::super::id::MemberId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMember {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMember {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
}
