use super::entities::LinkStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 家长发起关联申请
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct ConnectionRequest {
    /// 学生用户名或邮箱
    pub identifier: String,
}

// 兑换邀请码
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct RedeemInviteCodeRequest {
    pub code: String,
}

// 管理员直接关联
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct AdminCreateLinkRequest {
    pub parent_id: i64,
    pub student_id: i64,
}

// 管理员关联列表查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct ParentLinkListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<LinkStatus>,
}
