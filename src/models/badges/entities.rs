use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 徽章定义
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 授予记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct UserBadge {
    pub id: i64,
    pub badge_id: i64,
    pub user_id: i64,
    pub awarded_by: i64,
    pub reason: Option<String>,
    pub awarded_at: chrono::DateTime<chrono::Utc>,
}

// 用户已获得的徽章
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct AwardedBadge {
    pub badge: Badge,
    pub awarded_by: i64,
    pub reason: Option<String>,
    pub awarded_at: chrono::DateTime<chrono::Utc>,
}
