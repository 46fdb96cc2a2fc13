use serde::Deserialize;
use ts_rs::TS;

// 创建作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub allow_late_submission: bool,
}

// 更新作业请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub max_score: Option<f64>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub allow_late_submission: Option<bool>,
}
