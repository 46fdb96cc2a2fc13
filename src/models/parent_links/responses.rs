use super::entities::ParentStudentLink;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct InviteCodeResponse {
    pub code: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

// 关联及其双方
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct ParentLinkView {
    pub link: ParentStudentLink,
    pub parent: UserSummary,
    pub student: UserSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct ParentLinkListResponse {
    pub items: Vec<ParentLinkView>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct LinkedUsersResponse {
    pub items: Vec<ParentLinkView>,
}
