use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::UserSummary;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

// 管理员概览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AdminDashboard {
    pub users_by_role: Vec<LabelCount>,
    pub courses_by_status: Vec<LabelCount>,
    pub pending_reviews: i64,
    pub total_enrollments: i64,
}

// 教师概览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboard {
    pub course_count: i64,
    pub published_courses: i64,
    pub distinct_students: i64,
    pub submissions_awaiting_grading: i64,
}

// 学生概览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub active_enrollments: i64,
    pub completed_enrollments: i64,
    pub average_progress: f64,
    pub upcoming_deadlines: Vec<CalendarEvent>,
    pub badge_count: i64,
    pub unread_notifications: i64,
}

// 家长视角下单个孩子的概况
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct ChildSummary {
    pub student: UserSummary,
    pub enrolled_courses: i64,
    pub completed_courses: i64,
    pub average_progress: f64,
    pub average_grade: Option<f64>,
    pub badge_count: i64,
    pub upcoming_deadlines: Vec<CalendarEvent>,
}

// 家长概览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct ParentDashboard {
    pub children: Vec<ChildSummary>,
    pub unread_notifications: i64,
}

// 按角色区分的仪表盘
#[derive(Debug, Serialize, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    Teacher(TeacherDashboard),
    Student(StudentDashboard),
    Parent(ParentDashboard),
}

// 已评分作业
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AssignmentGrade {
    pub submission_id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub assignment_id: i64,
    pub assignment_title: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
}

// 测验成绩
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct QuizGrade {
    pub attempt_id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub passed: bool,
    pub attempt_number: i32,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentGradesResponse {
    pub student: UserSummary,
    pub assignments: Vec<AssignmentGrade>,
    pub quizzes: Vec<QuizGrade>,
    pub average_percentage: Option<f64>,
}

// 日历事件（作业截止）
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct CalendarEvent {
    pub assignment_id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub title: String,
    pub due_at: DateTime<Utc>,
    pub submitted: bool,
    pub graded: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct CalendarResponse {
    pub student_id: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub events: Vec<CalendarEvent>,
}
