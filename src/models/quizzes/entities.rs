use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 单选题
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub points: f64,
}

// 测验实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct Quiz {
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<QuizQuestion>,
    pub pass_percentage: f64,
    pub max_attempts: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 对外展示的题目，答案可隐藏
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizQuestionView {
    pub prompt: String,
    pub options: Vec<String>,
    pub points: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
}

// 对外展示的测验
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizView {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<QuizQuestionView>,
    pub total_points: f64,
    pub pass_percentage: f64,
    pub max_attempts: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Quiz {
    pub fn total_points(&self) -> f64 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// 转换为展示结构，`with_answers` 为 false 时隐藏正确答案
    pub fn to_view(&self, with_answers: bool) -> QuizView {
        QuizView {
            id: self.id,
            course_id: self.course_id,
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self
                .questions
                .iter()
                .map(|q| QuizQuestionView {
                    prompt: q.prompt.clone(),
                    options: q.options.clone(),
                    points: q.points,
                    correct_option: with_answers.then_some(q.correct_option),
                })
                .collect(),
            total_points: self.total_points(),
            pass_percentage: self.pass_percentage,
            max_attempts: self.max_attempts,
            created_at: self.created_at,
        }
    }
}

// 测验作答记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizAttempt {
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub answers: Vec<Option<usize>>,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub passed: bool,
    pub attempt_number: i32,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

// 一次作答的评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct QuizScore {
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub passed: bool,
}
