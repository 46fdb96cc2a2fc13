use super::entities::Enrollment;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;
use serde::Serialize;
use ts_rs::TS;

// 学生视角的选课记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentWithCourse {
    pub enrollment: Enrollment,
    pub course_title: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentWithCourse>,
    pub pagination: PaginationInfo,
}

// 课程花名册条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RosterEntry {
    pub enrollment: Enrollment,
    pub student: UserSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RosterResponse {
    pub items: Vec<RosterEntry>,
    pub pagination: PaginationInfo,
}

// 证书验证结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CertificateResponse {
    pub code: String,
    pub course_id: i64,
    pub course_title: String,
    pub student_name: String,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}
