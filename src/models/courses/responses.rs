use super::entities::Course;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;
use serde::Serialize;
use ts_rs::TS;

// 课程列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

// 课程排行榜条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct LeaderboardEntry {
    /// 没有任何已评分项目的学生没有名次
    pub rank: Option<u32>,
    pub student: UserSummary,
    /// 百分制，保留两位小数
    pub performance: Option<f64>,
    pub graded_items: u32,
}

// 课程排行榜响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct LeaderboardResponse {
    pub course_id: i64,
    pub entries: Vec<LeaderboardEntry>,
}
