use super::entities::CourseStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 课程列表查询参数（来自HTTP请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<CourseStatus>,
    pub teacher_id: Option<i64>,
    pub search: Option<String>,
}

// 课程列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: u64,
    pub size: u64,
    pub status: Option<CourseStatus>,
    pub teacher_id: Option<i64>,
    pub search: Option<String>,
}

// 创建课程请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// 仅管理员创建时需要指定授课教师
    pub teacher_id: Option<i64>,
}

// 更新课程请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

// 审核课程请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct ReviewCourseRequest {
    pub approve: bool,
    pub note: Option<String>,
}
