use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

// 日历查询窗口，缺省为从现在起的默认天数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct CalendarParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
