use serde::Deserialize;
use ts_rs::TS;

// 上报学习进度
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct UpdateProgressRequest {
    pub progress: i32,
}
