use super::entities::{AwardedBadge, Badge};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct BadgeListResponse {
    pub items: Vec<Badge>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct UserBadgeListResponse {
    pub user_id: i64,
    pub items: Vec<AwardedBadge>,
}
