use super::entities::{NotificationType, ReferenceType};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 创建通知（内部使用）
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<ReferenceType>,
    pub reference_id: Option<i64>,
}

// 通知列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default)]
    pub unread_only: Option<bool>,
}
