use garde::Validate;
use kernel::model::{
    id::MemberId,
    member::{
        event::{CreateMember, UpdateMember},
        Member,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
}

impl From<CreateMemberRequest> for CreateMember {
    fn from(request: CreateMemberRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
}

impl UpdateMemberRequest {
    pub fn into_event(self, member_id: MemberId) -> UpdateMember {
        UpdateMember {
            member_id,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: MemberId,
    pub name: String,
    pub email: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
        }
    }
}
