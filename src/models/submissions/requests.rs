use serde::Deserialize;
use ts_rs::TS;

// 提交/重新提交作业
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    /// 通过文件上传接口获得的下载令牌
    pub attachment_token: Option<String>,
}

// 评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}
