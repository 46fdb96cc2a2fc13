use super::entities::QuizQuestion;
use serde::Deserialize;
use ts_rs::TS;

// 创建测验请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct CreateQuizRequest {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<QuizQuestion>,
    #[serde(default = "default_pass_percentage")]
    pub pass_percentage: f64,
    pub max_attempts: Option<i32>,
}

fn default_pass_percentage() -> f64 {
    60.0
}

// 提交作答，未作答的题目为 null
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct SubmitAttemptRequest {
    pub answers: Vec<Option<usize>>,
}
